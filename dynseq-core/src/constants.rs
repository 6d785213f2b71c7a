//! Growth policy constants and size limits

use core::mem::size_of;

/// Factor applied to the capacity when a full sequence needs one more slot
pub const GROWTH_FACTOR: usize = 2;

/// Capacity allocated the first time an empty sequence grows
pub const INITIAL_CAPACITY: usize = 1;

/// Largest allocation in bytes the global allocator accepts (`isize::MAX`)
pub const MAX_ALLOCATION_BYTES: usize = isize::MAX as usize;

/// Maximum number of elements of type `T` a container can hold
///
/// Zero-sized types never allocate, so their limit is `usize::MAX`.
pub const fn max_size<T>() -> usize {
    let elem = size_of::<T>();
    if elem == 0 {
        usize::MAX
    } else {
        MAX_ALLOCATION_BYTES / elem
    }
}

/// Capacity to grow to when a sequence of `capacity` slots is full
///
/// Doubles the capacity, or starts at [`INITIAL_CAPACITY`] from zero. The
/// result saturates at [`max_size`] so the caller's length check reports the
/// overflow instead of wrapping.
pub const fn grown_capacity<T>(capacity: usize) -> usize {
    if capacity == 0 {
        INITIAL_CAPACITY
    } else {
        let doubled = capacity.saturating_mul(GROWTH_FACTOR);
        let max = max_size::<T>();
        if doubled > max {
            max
        } else {
            doubled
        }
    }
}
