//! Capacity formula and buffer configuration.

use crate::error::{BufferError, Result};

/// Smallest reservation a growing buffer receives, in elements.
pub const MIN_CAPACITY: usize = 16;

/// Once past [`MIN_CAPACITY`], capacity grows in multiples of this many elements.
pub const BLOCK_SIZE: usize = 8;

/// When a buffer gives memory back after removing an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShrinkPolicy {
    /// Never shrink on removal; only `compact` and `destroy` release memory.
    #[default]
    Deferred,
    /// Shrink to the recommended capacity when it is smaller than the
    /// reservation.
    Lazy,
    /// Shrink to the recommended capacity when it is not larger than the
    /// reservation, reallocating even if the size stays the same. Never grows
    /// a compacted buffer.
    Eager,
}

/// Growth parameters of a buffer.
///
/// Validated when a buffer is created; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Reservation for any length up to and including this value.
    pub min_capacity: usize,
    /// Growth increment past `min_capacity`. Must be non-zero.
    pub block_size: usize,
    /// Shrink timing after removals.
    pub shrink: ShrinkPolicy,
    /// Ceiling on `bytes_allocated`. A reservation above it fails as if the
    /// allocator had run out of memory.
    pub max_bytes: Option<usize>,
}

impl BufferConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            min_capacity: MIN_CAPACITY,
            block_size: BLOCK_SIZE,
            shrink: ShrinkPolicy::Deferred,
            max_bytes: None,
        }
    }

    #[must_use]
    pub const fn with_min_capacity(mut self, min_capacity: usize) -> Self {
        self.min_capacity = min_capacity;
        self
    }

    #[must_use]
    pub const fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    #[must_use]
    pub const fn with_shrink(mut self, shrink: ShrinkPolicy) -> Self {
        self.shrink = shrink;
        self
    }

    #[must_use]
    pub const fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = Some(max_bytes);
        self
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `BufferError::ZeroSize` if `block_size` is 0.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(BufferError::ZeroSize {
                parameter: "block_size",
            });
        }
        Ok(())
    }

    /// Recommended reservation for a buffer holding `length` elements.
    ///
    /// The result is `min_capacity` for short buffers, otherwise the smallest
    /// value not below `length` whose distance from `min_capacity` is a
    /// multiple of `block_size`. Saturates at `usize::MAX`. A zero
    /// `block_size` never rounds, so the result is then `length` itself.
    #[must_use]
    pub fn recommended_capacity(&self, length: usize) -> usize {
        if length <= self.min_capacity {
            return self.min_capacity;
        }
        let excess = length - self.min_capacity;
        length.saturating_add(amount_to_next_multiple(excess, self.block_size))
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Recommended reservation for `length` elements under the default configuration.
#[must_use]
pub fn recommended_capacity(length: usize) -> usize {
    BufferConfig::new().recommended_capacity(length)
}

fn amount_to_next_multiple(value: usize, multiple: usize) -> usize {
    match value.checked_rem(multiple) {
        None | Some(0) => 0,
        Some(rem) => multiple - rem,
    }
}
