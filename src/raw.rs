use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use tracing::debug;

use crate::config::BufferConfig;
use crate::engine::{Engine, Slots};
use crate::error::{BufferError, Result, Status};
use crate::header::BufferHeader;
use crate::iter::RawBufferIter;

/// Type-erased buffer of fixed-size elements.
///
/// The element size is chosen at runtime by [`RawBuffer::init`]; every element
/// is a byte slice of exactly that size. A buffer starts uninitialized and
/// every operation except `init` fails with `BufferError::Uninitialized`
/// until it is initialized.
#[derive(Debug, Default)]
pub struct RawBuffer {
    engine: Option<Engine>,
    bytes: Vec<u8>,
    config: BufferConfig,
}

/// `Vec<u8>` viewed as slots of `element_size` bytes.
struct ByteSlots<'a> {
    bytes: &'a mut Vec<u8>,
    element_size: usize,
}

impl Slots for ByteSlots<'_> {
    fn grow_slots(&mut self, slots: usize) -> core::result::Result<(), TryReserveError> {
        let wanted = slots * self.element_size;
        self.bytes
            .try_reserve_exact(wanted.saturating_sub(self.bytes.len()))
    }

    fn shrink_slots(&mut self, slots: usize) {
        self.bytes.shrink_to(slots * self.element_size);
    }
}

impl ByteSlots<'_> {
    /// Opens an element-sized hole at `index`, moving `index..length` up by one.
    /// Capacity for `length + 1` elements must already be reserved.
    fn make_gap(&mut self, index: usize, length: usize) {
        let size = self.element_size;
        let end = length * size;
        self.bytes.resize(end + size, 0);
        self.bytes.copy_within(index * size..end, (index + 1) * size);
    }

    /// Closes the hole at `index`, moving `index + 1..length` down by one.
    fn close_gap(&mut self, index: usize, length: usize) {
        let size = self.element_size;
        let end = length * size;
        self.bytes.copy_within((index + 1) * size..end, index * size);
        self.bytes.truncate(end - size);
    }
}

impl Clone for RawBuffer {
    fn clone(&self) -> Self {
        let mut bytes = Vec::with_capacity(self.reserved() * self.element_size());
        bytes.extend_from_slice(&self.bytes);
        Self {
            engine: self.engine.clone(),
            bytes,
            config: self.config,
        }
    }
}

impl RawBuffer {
    /// Creates an uninitialized buffer with the default growth configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an uninitialized buffer that will grow according to `config`.
    #[must_use]
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            engine: None,
            bytes: Vec::new(),
            config,
        }
    }

    /// Initializes the buffer for elements of `element_size` bytes.
    ///
    /// Any previous content is discarded without cleanup and the payload is
    /// released: the buffer ends up empty with nothing reserved.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::ZeroSize` if `element_size` or the configured
    /// block size is 0. The buffer is left as it was.
    pub fn init(&mut self, element_size: usize) -> Result<()> {
        let engine = Engine::new(element_size, self.config)?;
        self.bytes = Vec::new();
        self.engine = Some(engine);
        debug!(element_size, "raw buffer initialized");
        Ok(())
    }

    /// Creates and initializes a buffer in one step.
    ///
    /// # Errors
    ///
    /// See [`RawBuffer::init`].
    pub fn with_element_size(element_size: usize) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.init(element_size)?;
        Ok(buffer)
    }

    fn engine(&self) -> Result<&Engine> {
        self.engine.as_ref().ok_or(BufferError::Uninitialized)
    }

    fn parts(&mut self) -> Result<(&mut Engine, ByteSlots<'_>)> {
        let engine = self.engine.as_mut().ok_or(BufferError::Uninitialized)?;
        let element_size = engine.header().element_size;
        Ok((
            engine,
            ByteSlots {
                bytes: &mut self.bytes,
                element_size,
            },
        ))
    }

    fn check_size(&self, actual: usize) -> Result<()> {
        let expected = self.element_size();
        if actual != expected {
            return Err(BufferError::ElementSizeMismatch { expected, actual });
        }
        Ok(())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let length = self.len();
        if index >= length {
            return Err(BufferError::IndexOutOfBounds { index, length });
        }
        Ok(())
    }

    /// Returns `true` once `init` has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.engine.is_some()
    }

    /// Snapshot of the header. An uninitialized buffer reports element size 0
    /// and a header-only allocation.
    #[must_use]
    pub fn header(&self) -> BufferHeader {
        self.engine
            .as_ref()
            .map_or(BufferHeader::unreserved(0), |engine| *engine.header())
    }

    /// Returns the growth configuration.
    #[must_use]
    pub fn config(&self) -> &BufferConfig {
        &self.config
    }

    /// Returns the element size in bytes, 0 before `init`.
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.header().element_size
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.header().length
    }

    /// Returns `true` if the buffer holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of element slots currently reserved.
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.header().reserved
    }

    /// Returns the header size plus the reserved payload size in bytes.
    #[must_use]
    pub fn bytes_allocated(&self) -> usize {
        self.header().bytes_allocated
    }

    /// Bytes a buffer of `length` elements of this buffer's size would be
    /// given under its capacity formula.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`, and
    /// `BufferError::Alloc` if the size is not representable.
    pub fn required_bytes(&self, length: usize) -> Result<usize> {
        self.engine()?
            .required_bytes(length)
            .ok_or(BufferError::Alloc {
                requested: usize::MAX,
            })
    }

    /// The valid payload, element 0 first.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pointer to element 0. Invalidated by any call that takes `&mut self`.
    #[must_use]
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Gets the element at `index`, or `None` if out of bounds.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&[u8]> {
        let size = self.element_size();
        if index >= self.len() {
            return None;
        }
        self.bytes.get(index * size..(index + 1) * size)
    }

    /// Gets the element at `index` mutably, or `None` if out of bounds.
    #[must_use]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut [u8]> {
        let size = self.element_size();
        if index >= self.len() {
            return None;
        }
        self.bytes.get_mut(index * size..(index + 1) * size)
    }

    /// Copies the element at `index` into `dest`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized`, `BufferError::IndexOutOfBounds`,
    /// or `BufferError::ElementSizeMismatch` if `dest` is not one element long.
    pub fn copy_to(&self, index: usize, dest: &mut [u8]) -> Result<()> {
        self.engine()?;
        self.check_index(index)?;
        self.check_size(dest.len())?;
        let size = self.element_size();
        dest.copy_from_slice(&self.bytes[index * size..(index + 1) * size]);
        Ok(())
    }

    /// Overwrites the element at `index` with `src`.
    ///
    /// # Errors
    ///
    /// Same as [`RawBuffer::copy_to`].
    pub fn copy_from(&mut self, index: usize, src: &[u8]) -> Result<()> {
        self.engine()?;
        self.check_index(index)?;
        self.check_size(src.len())?;
        let size = self.element_size();
        self.bytes[index * size..(index + 1) * size].copy_from_slice(src);
        Ok(())
    }

    /// Returns an iterator over the elements.
    #[must_use]
    pub fn iter(&self) -> RawBufferIter<'_> {
        self.into_iter()
    }

    /// Grows the reservation so that `amount` more elements fit. Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized`, or `BufferError::Alloc` if the
    /// memory cannot be reserved; the buffer is unchanged in that case.
    pub fn reserve(&mut self, amount: usize) -> Result<()> {
        let (engine, mut slots) = self.parts()?;
        engine.reserve(&mut slots, amount)
    }

    /// Shrinks the reservation to exactly the current length.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`.
    pub fn compact(&mut self) -> Result<()> {
        let (engine, mut slots) = self.parts()?;
        engine.compact(&mut slots);
        debug!(reserved = engine.header().reserved, "raw buffer compacted");
        Ok(())
    }

    /// Inserts a copy of `source` at `index`, shifting later elements up.
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// - `BufferError::Uninitialized` before `init`
    /// - `BufferError::IndexOutOfBounds` if `index > len()`
    /// - `BufferError::ElementSizeMismatch` if `source` is not one element long
    /// - `BufferError::Alloc` if growing failed
    ///
    /// The buffer is unchanged on any error.
    pub fn insert(&mut self, index: usize, source: &[u8]) -> Result<()> {
        self.engine()?;
        let length = self.len();
        if index > length {
            return Err(BufferError::IndexOutOfBounds { index, length });
        }
        self.check_size(source.len())?;

        let (engine, mut slots) = self.parts()?;
        engine.grow_for(&mut slots, length + 1)?;
        slots.make_gap(index, length);
        let size = slots.element_size;
        slots.bytes[index * size..(index + 1) * size].copy_from_slice(source);
        engine.set_length(length + 1);
        Ok(())
    }

    /// Removes the element at `index`, shifting later elements down. When
    /// `dest` is given, the removed element is copied into it first.
    ///
    /// # Errors
    ///
    /// - `BufferError::Uninitialized` before `init`
    /// - `BufferError::IndexOutOfBounds` if `index >= len()`
    /// - `BufferError::ElementSizeMismatch` if `dest` is not one element long
    ///
    /// The buffer and `dest` are unchanged on any error.
    pub fn remove(&mut self, index: usize, dest: Option<&mut [u8]>) -> Result<()> {
        self.engine()?;
        self.check_index(index)?;
        if let Some(dest) = dest {
            self.check_size(dest.len())?;
            self.copy_to(index, dest)?;
        }

        let length = self.len();
        let (engine, mut slots) = self.parts()?;
        slots.close_gap(index, length);
        engine.set_length(length - 1);
        engine.settle_after_remove(&mut slots);
        Ok(())
    }

    /// Inserts a copy of `source` before the first element.
    ///
    /// # Errors
    ///
    /// See [`RawBuffer::insert`].
    pub fn push_front(&mut self, source: &[u8]) -> Result<()> {
        self.insert(0, source)
    }

    /// Appends a copy of `source`.
    ///
    /// # Errors
    ///
    /// See [`RawBuffer::insert`].
    pub fn push_back(&mut self, source: &[u8]) -> Result<()> {
        let length = self.len();
        self.insert(length, source)
    }

    /// Removes the first element, copying it into `dest` when given.
    ///
    /// Returns `Status::Warning` without touching `dest` if the buffer is empty.
    ///
    /// # Errors
    ///
    /// See [`RawBuffer::remove`].
    pub fn pop_front(&mut self, dest: Option<&mut [u8]>) -> Result<Status> {
        self.engine()?;
        if self.is_empty() {
            return Ok(Status::Warning);
        }
        self.remove(0, dest)?;
        Ok(Status::Ok)
    }

    /// Removes the last element, copying it into `dest` when given.
    ///
    /// Returns `Status::Warning` without touching `dest` if the buffer is empty.
    ///
    /// # Errors
    ///
    /// See [`RawBuffer::remove`].
    pub fn pop_back(&mut self, dest: Option<&mut [u8]>) -> Result<Status> {
        self.engine()?;
        if self.is_empty() {
            return Ok(Status::Warning);
        }
        self.remove(self.len() - 1, dest)?;
        Ok(Status::Ok)
    }

    /// Empties the buffer and releases its payload. The buffer stays
    /// initialized and can be reused or re-initialized.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`.
    pub fn destroy(&mut self) -> Result<()> {
        self.destroy_with(|_| {})
    }

    /// Like [`RawBuffer::destroy`], calling `cleanup` once on every element in
    /// ascending index order before the storage is released.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`.
    pub fn destroy_with<F>(&mut self, mut cleanup: F) -> Result<()>
    where
        F: FnMut(&mut [u8]),
    {
        let (engine, mut slots) = self.parts()?;
        let size = slots.element_size;
        for element in slots.bytes.chunks_exact_mut(size) {
            cleanup(element);
        }
        slots.bytes.clear();
        engine.release(&mut slots);
        debug!("raw buffer destroyed");
        Ok(())
    }

    /// Destroys the buffer and releases all of its memory.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`. The memory is
    /// released either way.
    pub fn free(self) -> Result<()> {
        self.free_with(|_| {})
    }

    /// Like [`RawBuffer::free`], calling `cleanup` on every element first.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Uninitialized` before `init`.
    pub fn free_with<F>(mut self, cleanup: F) -> Result<()>
    where
        F: FnMut(&mut [u8]),
    {
        self.destroy_with(cleanup)
    }
}
