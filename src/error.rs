use thiserror::Error;

/// Error types for buffer operations
///
/// Variants are ordered by severity. [`BufferError::code`] maps each one to the
/// signed status convention shared with [`Status`].
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum BufferError {
    /// A source or destination does not hold exactly one element
    #[error("Element size mismatch: expected {expected} bytes, got {actual} bytes")]
    ElementSizeMismatch {
        /// Element size of the buffer
        expected: usize,
        /// Size of the slice that was provided
        actual: usize,
    },
    /// The buffer was used before `init`
    #[error("Buffer is not initialized")]
    Uninitialized,
    /// The backing allocation could not be grown
    #[error("Allocation failed: could not reserve {requested} bytes")]
    Alloc {
        /// Total bytes the failed reservation needed, saturated on overflow
        requested: usize,
    },
    /// A parameter that must be non-zero was zero
    #[error("Zero value for {parameter}")]
    ZeroSize {
        /// Name of the offending parameter
        parameter: &'static str,
    },
    /// Index is beyond the valid range for the operation
    #[error("Index out of bounds: index {index} is beyond buffer length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the buffer
        length: usize,
    },
}

impl BufferError {
    /// Signed status code: general error 1, null 2, alloc 3, zero 4, index 5.
    #[must_use]
    pub fn code(&self) -> i8 {
        match self {
            Self::ElementSizeMismatch { .. } => 1,
            Self::Uninitialized => 2,
            Self::Alloc { .. } => 3,
            Self::ZeroSize { .. } => 4,
            Self::IndexOutOfBounds { .. } => 5,
        }
    }
}

/// Outcome of an operation that did not fail.
///
/// `Warning` means the call was a harmless no-op, for example popping from an
/// empty buffer.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub enum Status {
    /// Nothing was done
    Warning,
    /// The operation took effect
    Ok,
}

impl Status {
    /// Signed status code: warning -1, ok 0.
    #[must_use]
    pub fn code(self) -> i8 {
        match self {
            Self::Warning => -1,
            Self::Ok => 0,
        }
    }

    #[must_use]
    pub fn is_warning(self) -> bool {
        self == Self::Warning
    }
}

pub type Result<T> = core::result::Result<T, BufferError>;
