//! Borrowing random-access cursors
//!
//! [`Cursor`] is one type for both access modes, selected by a marker:
//!
//! - [`Shared`] cursors are `Copy` and iterate (both directions) over `&T`.
//!   Reverse traversal is the standard [`Rev`](core::iter::Rev) adapter, so
//!   the reversed cursor yields what the forward one yields one step back.
//! - [`Exclusive`] cursors hand out `&mut T` only through `&mut self` (or by
//!   consuming the cursor), which keeps free back-and-forth movement sound.
//!
//! An exclusive cursor widens into a shared one with `From`; there is no
//! conversion the other way.
//!
//! A cursor moves over `0..=len` of the range it was created on. Moving it
//! past either end panics, like indexing a slice out of bounds.

use crate::position::Position;
use core::cmp::Ordering;
use core::fmt;
use core::iter::FusedIterator;
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::ptr::NonNull;

mod sealed {
    pub trait Sealed {}
}

/// Access mode of a [`Cursor`]
pub trait Access: sealed::Sealed {
    /// Reference type the cursor stands in for
    type Borrow<'a, T: 'a>;
}

/// Read-only access marker
#[derive(Debug)]
pub enum Shared {}

/// Read-write access marker
#[derive(Debug)]
pub enum Exclusive {}

impl sealed::Sealed for Shared {}
impl sealed::Sealed for Exclusive {}

impl Access for Shared {
    type Borrow<'a, T: 'a> = &'a T;
}

impl Access for Exclusive {
    type Borrow<'a, T: 'a> = &'a mut T;
}

/// Random-access cursor over a borrowed contiguous range
pub struct Cursor<'a, T: 'a, M: Access = Shared> {
    base: NonNull<T>,
    len: usize,
    /// Current position
    front: usize,
    /// Exclusive limit for iteration from the back
    back: usize,
    generation: u64,
    _borrow: PhantomData<M::Borrow<'a, T>>,
}

// SAFETY: a cursor behaves like `&'a [T]` or `&'a mut [T]`; requiring both
// bounds covers either mode.
unsafe impl<T: Send + Sync, M: Access> Send for Cursor<'_, T, M> {}
// SAFETY: shared access to a cursor only yields `&T`.
unsafe impl<T: Sync, M: Access> Sync for Cursor<'_, T, M> {}

impl<'a, T, M: Access> Cursor<'a, T, M> {
    /// Build a cursor at `front` over `len` values starting at `base`
    ///
    /// # Safety
    ///
    /// `base` must point to `len` live values borrowed for `'a` in mode `M`,
    /// and `front <= len`.
    pub(crate) unsafe fn from_raw_parts(
        base: NonNull<T>,
        len: usize,
        front: usize,
        generation: u64,
    ) -> Self {
        debug_assert!(front <= len);
        Self {
            base,
            len,
            front,
            back: len,
            generation,
            _borrow: PhantomData,
        }
    }

    /// Offset of the cursor from the start of the range
    pub fn offset(&self) -> usize {
        self.front
    }

    /// Length of the whole range the cursor moves over
    pub fn range_len(&self) -> usize {
        self.len
    }

    /// True when the cursor sits one past the last value
    pub fn is_end(&self) -> bool {
        self.front == self.len
    }

    /// Lifetime-free position equivalent to this cursor
    pub fn position(&self) -> Position {
        Position::new(self.front as isize, self.generation)
    }

    /// Value under the cursor, or `None` at the end
    pub fn get(&self) -> Option<&T> {
        self.peek(0)
    }

    /// Value `n` steps away from the cursor, like `it[n]`
    pub fn peek(&self, n: isize) -> Option<&T> {
        let index = self.shifted(n).filter(|&i| i < self.len)?;
        // SAFETY: index < len, values are live for 'a.
        Some(unsafe { &*self.base.as_ptr().add(index) })
    }

    /// Cursor moved by `n` steps, or `None` when that leaves `0..=len`
    pub fn checked_offset(mut self, n: isize) -> Option<Self> {
        self.front = self.shifted(n)?;
        Some(self)
    }

    /// Signed distance from `other` to this cursor
    pub fn distance_from<N: Access>(&self, other: &Cursor<'_, T, N>) -> isize {
        self.front as isize - other.front as isize
    }

    fn shifted(&self, n: isize) -> Option<usize> {
        let target = self.front.checked_add_signed(n)?;
        (target <= self.len).then_some(target)
    }

    fn move_by(&mut self, n: isize) {
        match self.shifted(n) {
            Some(target) => self.front = target,
            None => panic!(
                "cursor at {} moved by {} outside 0..={}",
                self.front, n, self.len
            ),
        }
    }

    fn move_forward(&mut self, count: usize) {
        match self.front.checked_add(count).filter(|&t| t <= self.len) {
            Some(target) => self.front = target,
            None => panic!(
                "cursor at {} moved by +{} outside 0..={}",
                self.front, count, self.len
            ),
        }
    }

    fn move_back(&mut self, count: usize) {
        match self.front.checked_sub(count) {
            Some(target) => self.front = target,
            None => panic!(
                "cursor at {} moved by -{} outside 0..={}",
                self.front, count, self.len
            ),
        }
    }

    fn move_back_signed(&mut self, n: isize) {
        match n.checked_neg() {
            Some(neg) => self.move_by(neg),
            None => self.move_forward(n.unsigned_abs()),
        }
    }
}

impl<'a, T> Cursor<'a, T, Shared> {
    /// Value under the cursor, borrowed for the cursor's whole lifetime
    pub fn current(&self) -> Option<&'a T> {
        if self.front < self.len {
            // SAFETY: front < len, values are shared-borrowed for 'a.
            Some(unsafe { &*self.base.as_ptr().add(self.front) })
        } else {
            None
        }
    }

    /// The values between the cursor and its iteration limit
    pub fn as_slice(&self) -> &'a [T] {
        let len = self.back.saturating_sub(self.front);
        let start = self.front.min(self.back);
        // SAFETY: start + len <= back <= self.len, all live for 'a.
        unsafe { core::slice::from_raw_parts(self.base.as_ptr().add(start), len) }
    }
}

impl<'a, T> Cursor<'a, T, Exclusive> {
    /// Mutable access to the value under the cursor
    pub fn get_mut(&mut self) -> Option<&mut T> {
        if self.front < self.len {
            // SAFETY: front < len and the cursor holds the only borrow.
            Some(unsafe { &mut *self.base.as_ptr().add(self.front) })
        } else {
            None
        }
    }

    /// Turn the cursor into a mutable borrow of the value under it
    pub fn into_mut(self) -> Option<&'a mut T> {
        if self.front < self.len {
            // SAFETY: consuming the cursor ends every other access path.
            Some(unsafe { &mut *self.base.as_ptr().add(self.front) })
        } else {
            None
        }
    }

    /// Overwrite the value under the cursor, returning the old one
    pub fn replace(&mut self, value: T) -> Option<T> {
        self.get_mut().map(|slot| core::mem::replace(slot, value))
    }
}

/// Widening conversion: exclusive access can always be given up
impl<'a, T> From<Cursor<'a, T, Exclusive>> for Cursor<'a, T, Shared> {
    fn from(cursor: Cursor<'a, T, Exclusive>) -> Self {
        Self {
            base: cursor.base,
            len: cursor.len,
            front: cursor.front,
            back: cursor.back,
            generation: cursor.generation,
            _borrow: PhantomData,
        }
    }
}

impl<T> Clone for Cursor<'_, T, Shared> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T, Shared> {}

impl<T, M: Access> fmt::Debug for Cursor<'_, T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.front)
            .field("len", &self.len)
            .field("generation", &self.generation)
            .finish()
    }
}

impl<T, M: Access, N: Access> PartialEq<Cursor<'_, T, N>> for Cursor<'_, T, M> {
    fn eq(&self, other: &Cursor<'_, T, N>) -> bool {
        self.base == other.base && self.front == other.front
    }
}

/// Cursors over different ranges are unordered
impl<T, M: Access, N: Access> PartialOrd<Cursor<'_, T, N>> for Cursor<'_, T, M> {
    fn partial_cmp(&self, other: &Cursor<'_, T, N>) -> Option<Ordering> {
        if self.base != other.base {
            return None;
        }
        Some(self.front.cmp(&other.front))
    }
}

impl<T, M: Access> Add<isize> for Cursor<'_, T, M> {
    type Output = Self;

    fn add(mut self, rhs: isize) -> Self {
        self.move_by(rhs);
        self
    }
}

impl<T, M: Access> Add<usize> for Cursor<'_, T, M> {
    type Output = Self;

    fn add(mut self, rhs: usize) -> Self {
        self.move_forward(rhs);
        self
    }
}

impl<T, M: Access> Sub<isize> for Cursor<'_, T, M> {
    type Output = Self;

    fn sub(mut self, rhs: isize) -> Self {
        self.move_back_signed(rhs);
        self
    }
}

impl<T, M: Access> Sub<usize> for Cursor<'_, T, M> {
    type Output = Self;

    fn sub(mut self, rhs: usize) -> Self {
        self.move_back(rhs);
        self
    }
}

/// Signed distance between two cursors
impl<'a, T, M: Access> Sub<Cursor<'a, T, M>> for Cursor<'a, T, M> {
    type Output = isize;

    fn sub(self, rhs: Cursor<'a, T, M>) -> isize {
        self.distance_from(&rhs)
    }
}

impl<T, M: Access> AddAssign<isize> for Cursor<'_, T, M> {
    fn add_assign(&mut self, rhs: isize) {
        self.move_by(rhs);
    }
}

impl<T, M: Access> AddAssign<usize> for Cursor<'_, T, M> {
    fn add_assign(&mut self, rhs: usize) {
        self.move_forward(rhs);
    }
}

impl<T, M: Access> SubAssign<isize> for Cursor<'_, T, M> {
    fn sub_assign(&mut self, rhs: isize) {
        self.move_back_signed(rhs);
    }
}

impl<T, M: Access> SubAssign<usize> for Cursor<'_, T, M> {
    fn sub_assign(&mut self, rhs: usize) {
        self.move_back(rhs);
    }
}

impl<'a, T> Iterator for Cursor<'a, T, Shared> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.current();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back.saturating_sub(self.front);
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for Cursor<'a, T, Shared> {
    fn next_back(&mut self) -> Option<&'a T> {
        if self.back <= self.front {
            return None;
        }
        self.back -= 1;
        // SAFETY: back < len, values are shared-borrowed for 'a.
        Some(unsafe { &*self.base.as_ptr().add(self.back) })
    }
}

impl<T> ExactSizeIterator for Cursor<'_, T, Shared> {}

impl<T> FusedIterator for Cursor<'_, T, Shared> {}
