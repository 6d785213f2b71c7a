//! Error types for dynseq containers

use alloc::string::String;

/// Errors that can occur during sequence and fixed-array operations
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeqError {
    /// Checked access or position outside the live range
    #[cfg_attr(feature = "std", error("Index {index} out of range for length {len}"))]
    OutOfRange {
        /// The offending index or position offset.
        index: isize,
        /// The length of the container at the time of the call.
        len: usize,
    },

    /// A half-open range whose bounds are reversed or outside `[0, len]`
    #[cfg_attr(
        feature = "std",
        error("Range {first}..{last} out of range for length {len}")
    )]
    InvalidRange {
        /// Start of the range.
        first: isize,
        /// End of the range (exclusive).
        last: isize,
        /// The length of the container at the time of the call.
        len: usize,
    },

    /// A position taken before the storage was reallocated or shifted, or
    /// taken from another sequence
    #[cfg_attr(
        feature = "std",
        error("Position from generation {position} used at generation {current}")
    )]
    InvalidatedPosition {
        /// Generation stamped into the position.
        position: u64,
        /// Current generation of the sequence.
        current: u64,
    },

    /// Requested length or capacity exceeds what the container can hold
    #[cfg_attr(feature = "std", error("Requested length {requested} exceeds maximum {max}"))]
    LengthExceeded {
        /// Number of slots requested.
        requested: usize,
        /// Maximum number of slots allowed.
        max: usize,
    },

    /// The allocator could not provide a block
    #[cfg_attr(
        feature = "std",
        error("Allocation of {slots} slots ({bytes} bytes) failed")
    )]
    AllocationFailure {
        /// Number of element slots requested.
        slots: usize,
        /// Size of the block in bytes.
        bytes: usize,
    },

    /// An element constructor reported failure
    #[cfg_attr(feature = "std", error("Element construction failed: {0}"))]
    ConstructionFailure(String),
}

impl SeqError {
    /// Check whether this error is one of the range-validation failures
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            SeqError::OutOfRange { .. } | SeqError::InvalidRange { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_classification() {
        assert!(SeqError::OutOfRange { index: 3, len: 3 }.is_out_of_range());
        assert!(SeqError::InvalidRange {
            first: 2,
            last: 1,
            len: 3
        }
        .is_out_of_range());
        assert!(!SeqError::LengthExceeded {
            requested: 5,
            max: 4
        }
        .is_out_of_range());
    }

    #[cfg(feature = "std")]
    #[test]
    fn test_display_messages() {
        let err = SeqError::OutOfRange { index: 7, len: 2 };
        assert_eq!(err.to_string(), "Index 7 out of range for length 2");

        let err = SeqError::LengthExceeded {
            requested: 4,
            max: 3,
        };
        assert_eq!(err.to_string(), "Requested length 4 exceeds maximum 3");
    }
}
