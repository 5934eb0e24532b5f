/// Bookkeeping carried by every buffer.
///
/// `bytes_allocated` is always `HEADER_SIZE + reserved * element_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferHeader {
    /// Bytes per element. Zero only before `init`.
    pub element_size: usize,
    /// Number of valid elements.
    pub length: usize,
    /// Element slots available without reallocating.
    pub reserved: usize,
    /// Header plus payload reservation, in bytes.
    pub bytes_allocated: usize,
}

/// Size of the header accounted in `bytes_allocated`.
pub const HEADER_SIZE: usize = core::mem::size_of::<BufferHeader>();

impl BufferHeader {
    /// Header of a buffer with no payload reservation.
    #[must_use]
    pub const fn unreserved(element_size: usize) -> Self {
        Self {
            element_size,
            length: 0,
            reserved: 0,
            bytes_allocated: HEADER_SIZE,
        }
    }

    /// Bytes needed to hold `reserved` elements of this header's size,
    /// or `None` on overflow.
    #[must_use]
    pub fn bytes_for(&self, reserved: usize) -> Option<usize> {
        reserved
            .checked_mul(self.element_size)?
            .checked_add(HEADER_SIZE)
    }
}
