#![no_std]

//! `dynbuf`: a growable contiguous buffer of fixed-size elements.
//!
//! The buffer keeps a small header (element size, length, reserved slots,
//! bytes allocated) next to a payload of `reserved` element slots, and grows
//! the payload in fixed blocks instead of doubling it:
//!
//! - up to [`MIN_CAPACITY`] elements, the reservation is `MIN_CAPACITY`
//! - beyond that, the reservation is the length rounded up so that its
//!   distance from `MIN_CAPACITY` is a multiple of [`BLOCK_SIZE`]
//!
//! Wasted space is therefore bounded by one block. Insertion and removal at
//! any position shift the tail by one slot; growth reallocates only when the
//! reservation is exhausted, and shrinking is deferred to [`DynBuffer::compact`]
//! unless a [`ShrinkPolicy`] says otherwise.
//!
//! Two flavours share the same growth engine:
//!
//! - [`DynBuffer<T>`] stores values of a Rust type
//! - [`RawBuffer`] stores byte slices of a size chosen at runtime
//!
//! This crate is `no_std` compatible and needs only `alloc`.
//!
//! # Typed buffer
//!
//! ```
//! # use dynbuf::DynBuffer;
//! let mut buffer = DynBuffer::<u32>::new().unwrap();
//! for value in [10, 20, 30, 40, 50] {
//!     buffer.push_back(value).unwrap();
//! }
//!
//! assert_eq!(buffer.remove(2), Ok(30));
//! assert_eq!(buffer.as_slice(), &[10, 20, 40, 50]);
//!
//! assert_eq!(buffer.pop_front(), Some(10));
//! assert_eq!(buffer.as_slice(), &[20, 40, 50]);
//! assert_eq!(buffer.reserved(), 16);
//!
//! buffer.compact();
//! assert_eq!(buffer.reserved(), 3);
//! ```
//!
//! # Raw buffer
//!
//! A raw buffer is created uninitialized and gets its element size from
//! `init`. Removed elements are copied out into a caller-provided slice.
//!
//! ```
//! # use dynbuf::{RawBuffer, Status};
//! let mut buffer = RawBuffer::new();
//! buffer.init(4).unwrap();
//!
//! buffer.push_back(&7u32.to_le_bytes()).unwrap();
//! buffer.push_front(&3u32.to_le_bytes()).unwrap();
//! assert_eq!(buffer.get(0), Some(&3u32.to_le_bytes()[..]));
//!
//! let mut dest = [0u8; 4];
//! assert_eq!(buffer.pop_back(Some(&mut dest)), Ok(Status::Ok));
//! assert_eq!(u32::from_le_bytes(dest), 7);
//!
//! assert_eq!(buffer.pop_back(None), Ok(Status::Ok));
//! // Popping an empty buffer is a harmless no-op.
//! assert_eq!(buffer.pop_back(Some(&mut dest)), Ok(Status::Warning));
//!
//! buffer.free().unwrap();
//! ```
//!
//! # Cleanup
//!
//! `destroy_with` and `free_with` hand every element to a callback exactly
//! once, in ascending index order, before the storage is released:
//!
//! ```
//! # use dynbuf::RawBuffer;
//! let mut buffer = RawBuffer::with_element_size(1).unwrap();
//! buffer.push_back(b"a").unwrap();
//! buffer.push_back(b"b").unwrap();
//!
//! let mut seen = Vec::new();
//! buffer.destroy_with(|element| seen.push(element[0])).unwrap();
//! assert_eq!(seen, b"ab");
//! assert_eq!(buffer.reserved(), 0);
//! ```
//!
//! # Growth configuration
//!
//! ```
//! # use dynbuf::{BufferConfig, DynBuffer, ShrinkPolicy};
//! let config = BufferConfig::new()
//!     .with_min_capacity(4)
//!     .with_block_size(4)
//!     .with_shrink(ShrinkPolicy::Lazy);
//! let mut buffer = DynBuffer::<u8>::with_config(config).unwrap();
//!
//! buffer.push_back(1).unwrap();
//! assert_eq!(buffer.reserved(), 4);
//! ```

extern crate alloc;

mod config;
mod dyn_buffer;
mod engine;
mod error;
mod header;
mod iter;
mod raw;

pub use config::{recommended_capacity, BufferConfig, ShrinkPolicy, BLOCK_SIZE, MIN_CAPACITY};
pub use dyn_buffer::DynBuffer;
pub use error::{BufferError, Result, Status};
pub use header::{BufferHeader, HEADER_SIZE};
pub use iter::RawBufferIter;
pub use raw::RawBuffer;
