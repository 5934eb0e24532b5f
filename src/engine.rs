//! Reservation bookkeeping shared by the typed and the raw buffer.
//!
//! The engine owns the header and decides when and how far to reallocate.
//! The physical storage is reached through [`Slots`], so the same growth
//! policy drives a `Vec<T>` and a type-erased `Vec<u8>`.

use alloc::collections::TryReserveError;
use tracing::{trace, warn};

use crate::config::{BufferConfig, ShrinkPolicy};
use crate::error::{BufferError, Result};
use crate::header::BufferHeader;

/// Physical element storage behind a buffer.
pub(crate) trait Slots {
    /// Makes room for `slots` elements in total. Leaves the storage untouched
    /// on failure.
    fn grow_slots(&mut self, slots: usize) -> core::result::Result<(), TryReserveError>;

    /// Gives back room beyond `slots` elements. Never below the valid length.
    fn shrink_slots(&mut self, slots: usize);
}

#[derive(Debug, Clone)]
pub(crate) struct Engine {
    header: BufferHeader,
    config: BufferConfig,
}

impl Engine {
    pub(crate) fn new(element_size: usize, config: BufferConfig) -> Result<Self> {
        if element_size == 0 {
            return Err(BufferError::ZeroSize {
                parameter: "element_size",
            });
        }
        config.validate()?;
        Ok(Self {
            header: BufferHeader::unreserved(element_size),
            config,
        })
    }

    pub(crate) fn header(&self) -> &BufferHeader {
        &self.header
    }

    pub(crate) fn config(&self) -> &BufferConfig {
        &self.config
    }

    pub(crate) fn set_length(&mut self, length: usize) {
        debug_assert!(length <= self.header.reserved);
        self.header.length = length;
    }

    /// Bytes a buffer of `length` elements is given under the capacity formula.
    pub(crate) fn required_bytes(&self, length: usize) -> Option<usize> {
        self.header
            .bytes_for(self.config.recommended_capacity(length))
    }

    fn grow_to<S: Slots>(&mut self, slots: &mut S, reserved: usize) -> Result<()> {
        let bytes = self
            .header
            .bytes_for(reserved)
            .ok_or(BufferError::Alloc {
                requested: usize::MAX,
            })?;
        if self.config.max_bytes.is_some_and(|max| bytes > max) {
            return Err(BufferError::Alloc { requested: bytes });
        }
        slots
            .grow_slots(reserved)
            .map_err(|_| BufferError::Alloc { requested: bytes })?;

        trace!(
            from = self.header.reserved,
            to = reserved,
            bytes,
            "buffer reservation grown"
        );
        self.header.reserved = reserved;
        self.header.bytes_allocated = bytes;
        Ok(())
    }

    fn shrink_to<S: Slots>(&mut self, slots: &mut S, reserved: usize) {
        debug_assert!(reserved >= self.header.length);
        debug_assert!(reserved <= self.header.reserved);
        slots.shrink_slots(reserved);

        trace!(
            from = self.header.reserved,
            to = reserved,
            "buffer reservation shrunk"
        );
        self.header.reserved = reserved;
        // Cannot overflow: a larger reservation was representable before.
        self.header.bytes_allocated = self.header.bytes_for(reserved).unwrap_or(usize::MAX);
    }

    /// Ensures `length` elements fit, growing to the recommended capacity.
    ///
    /// If that reservation fails, the slack above `length` is halved until an
    /// attempt succeeds or no slack is left.
    pub(crate) fn grow_for<S: Slots>(&mut self, slots: &mut S, length: usize) -> Result<()> {
        if length <= self.header.reserved {
            return Ok(());
        }
        let target = self.config.recommended_capacity(length);
        let mut slack = target - length;
        loop {
            match self.grow_to(slots, length + slack) {
                Ok(()) => return Ok(()),
                Err(err) if slack == 0 => {
                    warn!(length, reserved = self.header.reserved, "buffer growth failed");
                    return Err(err);
                }
                Err(_) => {
                    slack /= 2;
                    warn!(length, slack, "buffer growth backing off");
                }
            }
        }
    }

    /// Ensures room for `amount` elements beyond the current length.
    pub(crate) fn reserve<S: Slots>(&mut self, slots: &mut S, amount: usize) -> Result<()> {
        let needed = self
            .header
            .length
            .checked_add(amount)
            .ok_or(BufferError::Alloc {
                requested: usize::MAX,
            })?;
        if needed <= self.header.reserved {
            return Ok(());
        }
        self.grow_to(slots, needed)
    }

    /// Drops all slack so that `reserved == length`.
    pub(crate) fn compact<S: Slots>(&mut self, slots: &mut S) {
        if self.header.length == self.header.reserved {
            return;
        }
        self.shrink_to(slots, self.header.length);
    }

    /// Applies the shrink policy once an element has been removed.
    pub(crate) fn settle_after_remove<S: Slots>(&mut self, slots: &mut S) {
        let target = self.config.recommended_capacity(self.header.length);
        match self.config.shrink {
            ShrinkPolicy::Deferred => {}
            ShrinkPolicy::Lazy => {
                if target < self.header.reserved {
                    self.shrink_to(slots, target);
                }
            }
            ShrinkPolicy::Eager => {
                if target <= self.header.reserved {
                    self.shrink_to(slots, target);
                }
            }
        }
    }

    /// Forgets all elements and releases the payload reservation.
    pub(crate) fn release<S: Slots>(&mut self, slots: &mut S) {
        self.header.length = 0;
        self.shrink_to(slots, 0);
    }
}
