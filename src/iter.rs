use core::slice::ChunksExact;

use crate::raw::RawBuffer;

/// Iterator over the elements of a `RawBuffer`, each one `element_size` bytes.
///
/// This iterator implements `Clone`.
#[derive(Clone, Debug)]
pub struct RawBufferIter<'a> {
    chunks: ChunksExact<'a, u8>,
}

impl<'a> Iterator for RawBufferIter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl DoubleEndedIterator for RawBufferIter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.chunks.next_back()
    }
}

impl ExactSizeIterator for RawBufferIter<'_> {}

impl<'a> IntoIterator for &'a RawBuffer {
    type Item = &'a [u8];
    type IntoIter = RawBufferIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        // An uninitialized buffer has no bytes; any non-zero chunk size yields nothing.
        let size = self.element_size().max(1);
        RawBufferIter {
            chunks: self.as_bytes().chunks_exact(size),
        }
    }
}
