//! # Dynseq Core
//!
//! A growable contiguous sequence with allocator-driven memory management and
//! strong rollback guarantees on every reallocating path.
//!
//! ## Modules
//!
//! - `constants`: Growth policy constants and size limits
//! - `error`: Error type shared by every container (SeqError)
//! - `allocator`: Allocation strategy trait, the global allocator and a tracking allocator
//! - `raw`: Owned raw storage block used by the containers
//! - `sequence`: The dynamic sequence container (DynSeq)
//! - `position`: Lifetime-free, generation-stamped positions
//! - `cursor`: Borrowing random-access cursors (shared / exclusive)
//! - `fixed`: Fixed-capacity sibling container (FixedArray)

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod allocator;
pub mod constants;
pub mod cursor;
pub mod error;
pub mod fixed;
pub mod position;
mod raw;
pub mod sequence;
mod serde_impl;

// Re-export commonly used types
pub use allocator::{AllocStats, Allocator, Global, TrackingAllocator};
pub use cursor::{Cursor, Exclusive, Shared};
pub use error::SeqError;
pub use fixed::FixedArray;
pub use position::Position;
pub use sequence::{DynSeq, IntoIter};

/// Result type alias for dynseq operations
pub type Result<T> = core::result::Result<T, SeqError>;

/// Build a [`DynSeq`] from a list of values, or `n` clones of one value.
///
/// ```
/// use dynseq_core::dynseq;
///
/// let seq = dynseq![10, 20, 30];
/// assert_eq!(seq.as_slice(), &[10, 20, 30]);
///
/// let zeros = dynseq![0u8; 4];
/// assert_eq!(zeros.len(), 4);
/// ```
#[macro_export]
macro_rules! dynseq {
    () => {
        $crate::DynSeq::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::DynSeq::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::DynSeq<_> as ::core::convert::From<_>>::from([$($x),+])
    };
}
