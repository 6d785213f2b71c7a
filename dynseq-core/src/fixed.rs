//! Fixed-capacity sibling container
//!
//! [`FixedArray`] keeps up to `N` values inline, with no allocator and no
//! reallocation. Its only failure is being asked to hold more than `N`.

use crate::error::SeqError;
use crate::Result;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::mem::{self, MaybeUninit};
use core::ops::{Deref, DerefMut};
use core::ptr;

/// Inline array holding between 0 and `N` values
///
/// ```
/// use dynseq_core::FixedArray;
///
/// let mut arr: FixedArray<u8, 3> = FixedArray::from_slice(&[1, 2]).unwrap();
/// arr.push(3).unwrap();
/// assert!(arr.push(4).is_err());
/// assert_eq!(arr.get::<2>(), Some(&3));
/// ```
pub struct FixedArray<T, const N: usize> {
    slots: [MaybeUninit<T>; N],
    len: usize,
}

/// Compile-time check that index `I` fits in an array of `N`
struct InBounds<const I: usize, const N: usize>;

impl<const I: usize, const N: usize> InBounds<I, N> {
    const OK: () = assert!(I < N, "index out of bounds for FixedArray");
}

impl<T, const N: usize> FixedArray<T, N> {
    /// Create an empty array
    pub const fn new() -> Self {
        Self {
            slots: [const { MaybeUninit::uninit() }; N],
            len: 0,
        }
    }

    /// Create an array holding clones of `values`
    ///
    /// Fails with [`SeqError::LengthExceeded`] when `values` holds more than
    /// `N` items.
    pub fn from_slice(values: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        if values.len() > N {
            return Err(SeqError::LengthExceeded {
                requested: values.len(),
                max: N,
            });
        }
        let mut arr = Self::new();
        for value in values {
            arr.slots[arr.len].write(value.clone());
            arr.len += 1;
        }
        Ok(arr)
    }

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Fixed capacity `N`
    pub const fn max_len(&self) -> usize {
        N
    }

    /// True when no values are held
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when all `N` slots are in use
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append `value`, failing when the array is full
    pub fn push(&mut self, value: T) -> Result<()> {
        if self.len == N {
            return Err(SeqError::LengthExceeded {
                requested: N + 1,
                max: N,
            });
        }
        self.slots[self.len].write(value);
        self.len += 1;
        Ok(())
    }

    /// Remove and return the last value
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: the slot was live and is now excluded from len.
        Some(unsafe { self.slots[self.len].assume_init_read() })
    }

    /// Drop every value
    pub fn clear(&mut self) {
        let live = self.len;
        self.len = 0;
        // SAFETY: the first `live` slots were initialised and are now excluded.
        unsafe {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(
                self.slots.as_mut_ptr().cast::<T>(),
                live,
            ))
        };
    }

    /// Checked access to the value at `index`
    pub fn at(&self, index: usize) -> Result<&T> {
        self.as_slice().get(index).ok_or(SeqError::OutOfRange {
            index: index as isize,
            len: self.len,
        })
    }

    /// Checked mutable access to the value at `index`
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(SeqError::OutOfRange {
                index: index as isize,
                len,
            })
    }

    /// Value at compile-time index `I`, if it is live
    ///
    /// `I >= N` is rejected at compile time.
    pub fn get<const I: usize>(&self) -> Option<&T> {
        #[allow(clippy::let_unit_value)]
        let () = InBounds::<I, N>::OK;
        self.as_slice().get(I)
    }

    /// First value, if any
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Last value, if any
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Set all `N` slots to clones of `value`; the array becomes full
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.clear();
        while self.len < N {
            self.slots[self.len].write(value.clone());
            self.len += 1;
        }
    }

    /// Exchange contents with `other`
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// The live values as a slice
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised.
        unsafe { &*ptr::slice_from_raw_parts(self.slots.as_ptr().cast::<T>(), self.len) }
    }

    /// The live values as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialised.
        unsafe { &mut *ptr::slice_from_raw_parts_mut(self.slots.as_mut_ptr().cast::<T>(), self.len) }
    }
}

impl<T, const N: usize> Drop for FixedArray<T, N> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T, const N: usize> Default for FixedArray<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> From<[T; N]> for FixedArray<T, N> {
    fn from(values: [T; N]) -> Self {
        Self {
            slots: values.map(MaybeUninit::new),
            len: N,
        }
    }
}

impl<T: Clone, const N: usize> Clone for FixedArray<T, N> {
    fn clone(&self) -> Self {
        let mut copy = Self::new();
        for value in self.as_slice() {
            copy.slots[copy.len].write(value.clone());
            copy.len += 1;
        }
        copy
    }
}

impl<T, const N: usize> Deref for FixedArray<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize> DerefMut for FixedArray<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, const N: usize> fmt::Debug for FixedArray<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T: PartialEq, const N: usize> PartialEq for FixedArray<T, N> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize> Eq for FixedArray<T, N> {}

impl<T: PartialEq, const N: usize> PartialEq<[T]> for FixedArray<T, N> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<T: PartialEq, const N: usize, const M: usize> PartialEq<[T; M]> for FixedArray<T, N> {
    fn eq(&self, other: &[T; M]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

/// Lexicographic, over the live values only
impl<T: PartialOrd, const N: usize> PartialOrd for FixedArray<T, N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, const N: usize> Ord for FixedArray<T, N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, const N: usize> Hash for FixedArray<T, N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}
