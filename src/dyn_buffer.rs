use alloc::collections::TryReserveError;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut};
use tracing::debug;

use crate::config::BufferConfig;
use crate::engine::{Engine, Slots};
use crate::error::{BufferError, Result};
use crate::header::BufferHeader;

impl<T> Slots for Vec<T> {
    fn grow_slots(&mut self, slots: usize) -> core::result::Result<(), TryReserveError> {
        self.try_reserve_exact(slots.saturating_sub(self.len()))
    }

    fn shrink_slots(&mut self, slots: usize) {
        self.shrink_to(slots);
    }
}

/// Growable contiguous buffer of `T` with block-aligned capacity growth.
///
/// Capacity follows the buffer's [`BufferConfig`] rather than doubling: a
/// buffer holds at least `min_capacity` slots once anything is stored, and
/// grows in steps of `block_size` slots beyond that. Read access goes through
/// `Deref<Target = [T]>`.
#[derive(Debug)]
pub struct DynBuffer<T> {
    items: Vec<T>,
    engine: Engine,
}

impl<T> DynBuffer<T> {
    /// Creates an empty buffer with the default growth configuration.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::ZeroSize` if `T` is zero-sized.
    pub fn new() -> Result<Self> {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty buffer that grows according to `config`.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::ZeroSize` if `T` is zero-sized or
    /// `config.block_size` is 0.
    pub fn with_config(config: BufferConfig) -> Result<Self> {
        let engine = Engine::new(core::mem::size_of::<T>(), config)?;
        Ok(Self {
            items: Vec::new(),
            engine,
        })
    }

    /// Returns a copy of the buffer header.
    #[must_use]
    pub fn header(&self) -> BufferHeader {
        *self.engine.header()
    }

    /// Returns the growth configuration.
    #[must_use]
    pub fn config(&self) -> &BufferConfig {
        self.engine.config()
    }

    /// Returns the size of one element in bytes.
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.engine.header().element_size
    }

    /// Returns the number of element slots currently reserved.
    #[must_use]
    pub fn reserved(&self) -> usize {
        self.engine.header().reserved
    }

    /// Returns the header size plus the reserved payload size in bytes.
    #[must_use]
    pub fn bytes_allocated(&self) -> usize {
        self.engine.header().bytes_allocated
    }

    /// Bytes a buffer of `length` elements would be given, or `None` if not
    /// representable.
    #[must_use]
    pub fn required_bytes(&self, length: usize) -> Option<usize> {
        self.engine.required_bytes(length)
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Returns the elements as a mutable slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    /// Grows the reservation so that `amount` more elements fit. Never shrinks.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::Alloc` if the memory cannot be reserved; the
    /// buffer is unchanged in that case.
    pub fn reserve(&mut self, amount: usize) -> Result<()> {
        self.engine.reserve(&mut self.items, amount)
    }

    /// Shrinks the reservation to exactly the current length.
    pub fn compact(&mut self) {
        self.engine.compact(&mut self.items);
        debug!(reserved = self.reserved(), "buffer compacted");
    }

    /// Inserts `value` at `index`, shifting later elements up.
    /// `index == len()` appends.
    ///
    /// # Errors
    ///
    /// - `BufferError::IndexOutOfBounds` if `index > len()`
    /// - `BufferError::Alloc` if growing failed
    ///
    /// The buffer is unchanged on any error.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        let length = self.items.len();
        if index > length {
            return Err(BufferError::IndexOutOfBounds { index, length });
        }
        self.engine.grow_for(&mut self.items, length + 1)?;
        self.items.insert(index, value);
        self.engine.set_length(length + 1);
        Ok(())
    }

    /// Removes and returns the element at `index`, shifting later elements down.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::IndexOutOfBounds` if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> Result<T> {
        let length = self.items.len();
        if index >= length {
            return Err(BufferError::IndexOutOfBounds { index, length });
        }
        let value = self.items.remove(index);
        self.engine.set_length(length - 1);
        self.engine.settle_after_remove(&mut self.items);
        Ok(value)
    }

    /// Replaces the element at `index`, returning the previous one.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::IndexOutOfBounds` if `index >= len()`.
    pub fn replace(&mut self, index: usize, value: T) -> Result<T> {
        let length = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(BufferError::IndexOutOfBounds { index, length })?;
        Ok(core::mem::replace(slot, value))
    }

    /// Inserts `value` before the first element.
    ///
    /// # Errors
    ///
    /// See [`DynBuffer::insert`].
    pub fn push_front(&mut self, value: T) -> Result<()> {
        self.insert(0, value)
    }

    /// Appends `value`.
    ///
    /// # Errors
    ///
    /// See [`DynBuffer::insert`].
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.insert(self.items.len(), value)
    }

    /// Removes the first element. `None` means there was nothing to remove.
    pub fn pop_front(&mut self) -> Option<T> {
        self.remove(0).ok()
    }

    /// Removes the last element. `None` means there was nothing to remove.
    pub fn pop_back(&mut self) -> Option<T> {
        let last = self.items.len().checked_sub(1)?;
        self.remove(last).ok()
    }

    /// Drops every element and releases the payload. The buffer stays usable.
    pub fn destroy(&mut self) {
        self.destroy_with(drop);
    }

    /// Hands every element to `cleanup` in ascending index order, then
    /// releases the payload. The buffer stays usable.
    pub fn destroy_with<F>(&mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        // The drain empties `items` even if `cleanup` panics.
        self.engine.set_length(0);
        self.items.drain(..).for_each(cleanup);
        self.engine.release(&mut self.items);
        debug!("buffer destroyed");
    }

    /// Destroys the buffer and releases all of its memory.
    pub fn free(self) {
        self.free_with(drop);
    }

    /// Like [`DynBuffer::free`], handing every element to `cleanup` first.
    pub fn free_with<F>(mut self, cleanup: F)
    where
        F: FnMut(T),
    {
        self.destroy_with(cleanup);
    }
}

impl<T: Clone> Clone for DynBuffer<T> {
    fn clone(&self) -> Self {
        // Keep the reservation, `Vec::clone` would only allocate `len` slots.
        let mut items = Vec::with_capacity(self.reserved());
        items.extend_from_slice(&self.items);
        Self {
            items,
            engine: self.engine.clone(),
        }
    }
}

impl<T> Deref for DynBuffer<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.items
    }
}

impl<T> DerefMut for DynBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}

impl<'a, T> IntoIterator for &'a DynBuffer<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: PartialEq> PartialEq for DynBuffer<T> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<T: Eq> Eq for DynBuffer<T> {}
