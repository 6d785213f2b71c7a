//! The dynamic sequence container
//!
//! [`DynSeq`] keeps `len` live values at the front of one allocator block of
//! `capacity` slots. Every operation that can run out of memory returns a
//! [`Result`](crate::Result) and leaves the sequence exactly as it was when it
//! fails. Values are relocated bitwise when the block is replaced, so once a
//! new block has been allocated nothing can fail; copies of the whole
//! sequence clone value by value and roll back if a clone panics.
//!
//! Trait implementations that cannot report an error (`Clone`, `Extend`,
//! `FromIterator`, `From`) panic on allocation failure, like the standard
//! collections do.

use crate::allocator::{Allocator, Global};
use crate::constants::{grown_capacity, max_size};
use crate::cursor::{Cursor, Exclusive, Shared};
use crate::error::SeqError;
use crate::position::{fresh_generation, Position};
use crate::raw::RawBuffer;
use crate::Result;
use alloc::string::ToString;
use core::cmp::Ordering;
use core::fmt;
use core::hash::{Hash, Hasher};
use core::iter::{FusedIterator, Rev};
use core::mem::ManuallyDrop;
use core::ops::{Deref, DerefMut, Index, IndexMut};
use core::ptr::{self, NonNull};

#[cfg(feature = "logging")]
use tracing::debug;

/// A contiguous growable sequence with a pluggable allocator
///
/// ```
/// use dynseq_core::DynSeq;
///
/// let mut seq = DynSeq::new();
/// seq.push_back(1).unwrap();
/// seq.push_back(3).unwrap();
/// seq.insert(seq.begin() + 1usize, 2).unwrap();
/// assert_eq!(seq, [1, 2, 3]);
/// ```
pub struct DynSeq<T, A: Allocator = Global> {
    buf: RawBuffer<T, A>,
    len: usize,
    generation: u64,
}

/// Panic with the error of an operation that has no way to return it
#[cold]
#[track_caller]
fn fail(err: SeqError) -> ! {
    panic!("dynseq operation failed: {:?}", err)
}

impl<T> DynSeq<T, Global> {
    /// Create an empty sequence; nothing is allocated
    pub fn new() -> Self {
        Self::new_in(Global)
    }

    /// Create an empty sequence with room for exactly `capacity` values
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        Self::with_capacity_in(capacity, Global)
    }

    /// Create a sequence of `len` default values
    pub fn with_len(len: usize) -> Result<Self>
    where
        T: Default,
    {
        Self::with_len_in(len, Global)
    }

    /// Create a sequence of `len` clones of `value`
    pub fn filled(len: usize, value: T) -> Result<Self>
    where
        T: Clone,
    {
        Self::filled_in(len, value, Global)
    }

    /// Create a sequence of `n` clones of `value`, panicking if it cannot be
    /// allocated
    ///
    /// This is the form used by `dynseq![value; n]`.
    pub fn from_elem(value: T, n: usize) -> Self
    where
        T: Clone,
    {
        Self::filled(n, value).unwrap_or_else(|e| fail(e))
    }

    /// Create a sequence holding clones of `values`
    pub fn from_slice(values: &[T]) -> Result<Self>
    where
        T: Clone,
    {
        Self::from_slice_in(values, Global)
    }
}

impl<T, A: Allocator> DynSeq<T, A> {
    /// Create an empty sequence using `alloc`
    pub fn new_in(alloc: A) -> Self {
        Self {
            buf: RawBuffer::new_in(alloc),
            len: 0,
            generation: fresh_generation(),
        }
    }

    /// Create an empty sequence with room for exactly `capacity` values
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        Ok(Self {
            buf: RawBuffer::with_capacity_in(capacity, alloc)?,
            len: 0,
            generation: fresh_generation(),
        })
    }

    /// Create a sequence of `len` default values using `alloc`
    pub fn with_len_in(len: usize, alloc: A) -> Result<Self>
    where
        T: Default,
    {
        let mut seq = Self::with_capacity_in(len, alloc)?;
        seq.fill_tail(len, T::default);
        Ok(seq)
    }

    /// Create a sequence of `len` clones of `value` using `alloc`
    pub fn filled_in(len: usize, value: T, alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        let mut seq = Self::with_capacity_in(len, alloc)?;
        seq.fill_tail(len, || value.clone());
        Ok(seq)
    }

    /// Create a sequence holding clones of `values` using `alloc`
    pub fn from_slice_in(values: &[T], alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        let mut seq = Self::with_capacity_in(values.len(), alloc)?;
        let mut source = values.iter();
        seq.fill_tail(values.len(), || match source.next() {
            Some(value) => value.clone(),
            None => unreachable!("fill_tail asks for exactly values.len() items"),
        });
        Ok(seq)
    }

    /// Create a sequence from the values of an iterator using `alloc`
    ///
    /// Reserves the iterator's lower size bound up front, then appends.
    pub fn from_iter_in<I>(iter: I, alloc: A) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let iter = iter.into_iter();
        let mut seq = Self::with_capacity_in(iter.size_hint().0, alloc)?;
        for value in iter {
            seq.push_back(value)?;
        }
        Ok(seq)
    }

    // ---- Capacity ------------------------------------------------------

    /// Number of live values
    pub fn len(&self) -> usize {
        self.len
    }

    /// True when the sequence holds no values
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of slots allocated
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Largest number of values a sequence of `T` can hold
    pub const fn max_size(&self) -> usize {
        max_size::<T>()
    }

    /// The sequence's allocator
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }

    /// Current generation; unique to this sequence and replaced whenever
    /// positions are invalidated
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ensure room for at least `new_capacity` values
    ///
    /// Does nothing when the capacity is already large enough. Otherwise the
    /// values move to a block of exactly `new_capacity` slots and every
    /// outstanding [`Position`] is invalidated. On failure the sequence is
    /// unchanged.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<()> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let max = max_size::<T>();
        if new_capacity > max {
            return Err(SeqError::LengthExceeded {
                requested: new_capacity,
                max,
            });
        }
        self.buf.relocate(self.len, new_capacity)?;
        self.invalidate();
        Ok(())
    }

    /// Reduce the capacity to exactly the length
    ///
    /// An empty sequence gives its block back entirely. On failure the
    /// sequence is unchanged.
    pub fn shrink_to_fit(&mut self) -> Result<()> {
        if self.len < self.capacity() {
            #[cfg(feature = "logging")]
            debug!(
                "Shrinking sequence from {} to {} slots",
                self.capacity(),
                self.len
            );

            self.buf.relocate(self.len, self.len)?;
            self.invalidate();
        }
        Ok(())
    }

    /// Make room for one more value using the amortized growth policy
    fn grow_for_one(&mut self) -> Result<()> {
        if self.len < self.capacity() {
            return Ok(());
        }
        let target = grown_capacity::<T>(self.capacity());
        if target <= self.capacity() {
            return Err(SeqError::LengthExceeded {
                requested: self.capacity().saturating_add(1),
                max: max_size::<T>(),
            });
        }
        self.reserve(target)
    }

    fn invalidate(&mut self) {
        self.generation = fresh_generation();
    }

    // ---- Mutators ------------------------------------------------------

    /// Append `value`
    ///
    /// On failure the value is dropped and the sequence is unchanged.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        self.grow_for_one()?;
        // SAFETY: len < capacity after growing; the slot is uninitialised.
        unsafe { self.buf.allocator().construct(self.buf.slot(self.len), value) };
        self.len += 1;
        Ok(())
    }

    /// Append the value built by `make`, constructed after any growth
    ///
    /// If `make` panics the length is unchanged.
    pub fn emplace_back_with<F>(&mut self, make: F) -> Result<&mut T>
    where
        F: FnOnce() -> T,
    {
        self.grow_for_one()?;
        let value = make();
        Ok(self.place_last(value))
    }

    /// Append the value built by a fallible constructor
    ///
    /// A constructor error is reported as [`SeqError::ConstructionFailure`]
    /// and leaves the length unchanged.
    pub fn try_emplace_back<F, E>(&mut self, make: F) -> Result<&mut T>
    where
        F: FnOnce() -> core::result::Result<T, E>,
        E: fmt::Display,
    {
        self.grow_for_one()?;
        let value = make().map_err(|e| SeqError::ConstructionFailure(e.to_string()))?;
        Ok(self.place_last(value))
    }

    fn place_last(&mut self, value: T) -> &mut T {
        // SAFETY: callers grew the block so len < capacity.
        unsafe {
            let slot = self.buf.slot(self.len);
            self.buf.allocator().construct(slot, value);
            self.len += 1;
            &mut *slot.as_ptr()
        }
    }

    /// Remove and return the last value
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        // SAFETY: len > 0 checked above.
        Some(unsafe { self.pop_back_unchecked() })
    }

    /// Remove and return the last value without checking for emptiness
    ///
    /// # Safety
    ///
    /// The sequence must not be empty.
    pub unsafe fn pop_back_unchecked(&mut self) -> T {
        debug_assert!(self.len > 0);
        self.len -= 1;
        // SAFETY: the slot at the old last index is live.
        unsafe { self.buf.allocator().extract(self.buf.slot(self.len)) }
    }

    /// Destroy every value, last first; the capacity is kept
    pub fn clear(&mut self) {
        while self.len > 0 {
            self.len -= 1;
            // SAFETY: the slot was live; len already excludes it.
            unsafe { self.buf.allocator().destroy(self.buf.slot(self.len)) };
        }
    }

    /// Destroy the values past `len`, if any
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        let old_len = self.len;
        self.len = len;
        // SAFETY: slots [len, old_len) were live and are now excluded.
        unsafe { self.buf.destroy_range(len, old_len) };
    }

    /// Insert `value` before `position`, shifting the tail right
    ///
    /// `position` may be anywhere in `begin()..=end()`. Returns the position
    /// of the inserted value. Every earlier position is invalidated.
    pub fn insert(&mut self, position: Position, value: T) -> Result<Position> {
        self.check_generation(position)?;
        let index = self.index_in(position, self.len)?;

        self.grow_for_one()?;
        // SAFETY: index <= len < capacity; the tail moves one slot right
        // within the block, overlap handled by `ptr::copy`.
        unsafe {
            let base = self.buf.base().as_ptr();
            ptr::copy(base.add(index), base.add(index + 1), self.len - index);
            self.buf
                .allocator()
                .construct(NonNull::new_unchecked(base.add(index)), value);
        }
        self.len += 1;
        self.invalidate();
        Ok(Position::new(index as isize, self.generation))
    }

    /// Destroy the value at `position`, shifting the tail left
    ///
    /// `position` must be in `begin()..end()`. Returns the position of the
    /// value that took its place (or `end()`).
    pub fn erase(&mut self, position: Position) -> Result<Position> {
        self.check_generation(position)?;
        let index = match position.index() {
            Some(index) if index < self.len => index,
            _ => {
                return Err(SeqError::OutOfRange {
                    index: position.offset(),
                    len: self.len,
                })
            }
        };

        let tail = self.len - index - 1;
        // A panicking Drop leaks the tail instead of dropping it twice.
        self.len = index;
        // SAFETY: the slot at `index` is live; the tail moves one slot left
        // within the block.
        unsafe {
            self.buf.allocator().destroy(self.buf.slot(index));
            let base = self.buf.base().as_ptr();
            ptr::copy(base.add(index + 1), base.add(index), tail);
        }
        self.len = index + tail;
        self.invalidate();
        Ok(Position::new(index as isize, self.generation))
    }

    /// Destroy the values in `first..last`, shifting the tail left
    ///
    /// Both bounds must be in `begin()..=end()` with `first <= last`.
    /// Returns `first` re-stamped for the new generation.
    pub fn erase_range(&mut self, first: Position, last: Position) -> Result<Position> {
        self.check_generation(first)?;
        self.check_generation(last)?;
        let range_error = || SeqError::InvalidRange {
            first: first.offset(),
            last: last.offset(),
            len: self.len,
        };
        let (from, to) = match (first.index(), last.index()) {
            (Some(from), Some(to)) if from <= to && to <= self.len => (from, to),
            _ => return Err(range_error()),
        };

        let old_len = self.len;
        let tail = old_len - to;
        self.len = from;
        // SAFETY: slots [from, to) are live and excluded from len; the tail
        // [to, old_len) moves down to `from` within the block.
        unsafe {
            self.buf.destroy_range(from, to);
            let base = self.buf.base().as_ptr();
            ptr::copy(base.add(to), base.add(from), tail);
        }
        self.len = from + tail;
        self.invalidate();
        Ok(Position::new(from as isize, self.generation))
    }

    /// Resize to `count` values, appending defaults or dropping the tail
    pub fn resize(&mut self, count: usize) -> Result<()>
    where
        T: Default,
    {
        self.resize_with(count, T::default)
    }

    /// Resize to `count` values, appending clones of `value` or dropping the
    /// tail
    pub fn resize_with_value(&mut self, count: usize, value: T) -> Result<()>
    where
        T: Clone,
    {
        self.resize_with(count, || value.clone())
    }

    /// Resize to `count` values, appending values built by `make` or dropping
    /// the tail
    ///
    /// Grows the block to exactly `count` when it is too small; shrinking
    /// never reallocates.
    pub fn resize_with<F>(&mut self, count: usize, make: F) -> Result<()>
    where
        F: FnMut() -> T,
    {
        if count > self.capacity() {
            self.reserve(count)?;
        }
        if count == 0 {
            self.clear();
        } else if count > self.len {
            self.fill_tail(count, make);
        } else {
            self.truncate(count);
        }
        Ok(())
    }

    /// Construct values at the tail until the length is `count`
    ///
    /// The capacity must already be at least `count`. The length tracks
    /// every construction, so a panic in `make` leaves the built prefix.
    fn fill_tail<F>(&mut self, count: usize, mut make: F)
    where
        F: FnMut() -> T,
    {
        debug_assert!(count <= self.capacity());
        while self.len < count {
            let value = make();
            // SAFETY: len < count <= capacity; the slot is uninitialised.
            unsafe { self.buf.allocator().construct(self.buf.slot(self.len), value) };
            self.len += 1;
        }
    }

    // ---- Copy / move ---------------------------------------------------

    /// Copy of the sequence with the same capacity, or the allocation error
    ///
    /// If a clone panics, the values cloned so far are dropped and the new
    /// block released before the panic continues.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
        A: Clone,
    {
        Ok(Self {
            buf: self.buf.clone_in(self.len, self.allocator().clone())?,
            len: self.len,
            generation: fresh_generation(),
        })
    }

    /// Replace the contents with clones of `source`
    ///
    /// The replacement is built in full before the current values are
    /// released, so on failure (error or panicking clone) this sequence is
    /// untouched.
    pub fn try_assign_from(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
        A: Clone,
    {
        let mut fresh = source.buf.clone_in(source.len, self.allocator().clone())?;
        self.clear();
        self.buf.swap_block(&mut fresh);
        self.len = source.len;
        self.invalidate();
        Ok(())
    }

    /// Move the contents out, leaving this sequence empty with no block
    ///
    /// `*target = source.take()` is move-assignment.
    pub fn take(&mut self) -> Self
    where
        A: Clone,
    {
        let empty = Self::new_in(self.allocator().clone());
        self.invalidate();
        core::mem::replace(self, empty)
    }

    // ---- Element access ------------------------------------------------

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

    /// First value, if any
    pub fn front(&self) -> Option<&T> {
        self.as_slice().first()
    }

    /// Mutable first value, if any
    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().first_mut()
    }

    /// Last value, if any
    pub fn back(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Mutable last value, if any
    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.as_mut_slice().last_mut()
    }

    /// Value at `index` without bounds checking
    ///
    /// # Safety
    ///
    /// `index < len()`.
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        debug_assert!(index < self.len);
        // SAFETY: caller guarantees index < len.
        unsafe { &*self.buf.slot(index).as_ptr() }
    }

    /// Mutable value at `index` without bounds checking
    ///
    /// # Safety
    ///
    /// `index < len()`.
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.len);
        // SAFETY: caller guarantees index < len.
        unsafe { &mut *self.buf.slot(index).as_ptr() }
    }

    /// First value without checking for emptiness
    ///
    /// # Safety
    ///
    /// The sequence must not be empty.
    pub unsafe fn front_unchecked(&self) -> &T {
        // SAFETY: forwarded caller contract.
        unsafe { self.get_unchecked(0) }
    }

    /// Last value without checking for emptiness
    ///
    /// # Safety
    ///
    /// The sequence must not be empty.
    pub unsafe fn back_unchecked(&self) -> &T {
        // SAFETY: forwarded caller contract.
        unsafe { self.get_unchecked(self.len.wrapping_sub(1)) }
    }

    /// Raw pointer to the first slot; null when nothing is allocated
    pub fn data(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable raw pointer to the first slot; null when nothing is allocated
    pub fn data_mut(&mut self) -> *mut T {
        self.buf.as_ptr()
    }

    /// The live values as a slice
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: base is valid (or dangling for len 0) for len live values.
        unsafe { core::slice::from_raw_parts(self.buf.base().as_ptr(), self.len) }
    }

    /// The live values as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: base is valid (or dangling for len 0) for len live values.
        unsafe { core::slice::from_raw_parts_mut(self.buf.base().as_ptr(), self.len) }
    }

    // ---- Positions and cursors -----------------------------------------

    /// Position of the first value
    pub fn begin(&self) -> Position {
        Position::new(0, self.generation)
    }

    /// Position one past the last value
    pub fn end(&self) -> Position {
        Position::new(self.len as isize, self.generation)
    }

    /// Shared cursor at the first value
    pub fn iter(&self) -> Cursor<'_, T, Shared> {
        // SAFETY: len live values borrowed shared for the returned lifetime.
        unsafe { Cursor::from_raw_parts(self.buf.base(), self.len, 0, self.generation) }
    }

    /// Shared cursor at the first value; same as [`DynSeq::iter`]
    pub fn cursor_begin(&self) -> Cursor<'_, T, Shared> {
        self.iter()
    }

    /// Mutable iterator over the values
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Reverse traversal, last value first
    pub fn rbegin(&self) -> Rev<Cursor<'_, T, Shared>> {
        self.iter().rev()
    }

    /// Shared cursor at `position`
    pub fn cursor(&self, position: Position) -> Result<Cursor<'_, T, Shared>> {
        self.check_generation(position)?;
        let index = self.index_in(position, self.len)?;
        // SAFETY: index <= len; shared borrow of self.
        Ok(unsafe { Cursor::from_raw_parts(self.buf.base(), self.len, index, self.generation) })
    }

    /// Exclusive cursor at `position`
    pub fn cursor_mut(&mut self, position: Position) -> Result<Cursor<'_, T, Exclusive>> {
        self.check_generation(position)?;
        let index = self.index_in(position, self.len)?;
        // SAFETY: index <= len; exclusive borrow of self.
        Ok(unsafe { Cursor::from_raw_parts(self.buf.base(), self.len, index, self.generation) })
    }

    fn check_generation(&self, position: Position) -> Result<()> {
        if position.generation() != self.generation {
            return Err(SeqError::InvalidatedPosition {
                position: position.generation(),
                current: self.generation,
            });
        }
        Ok(())
    }

    /// Index of `position` if it lies in `0..=limit`
    fn index_in(&self, position: Position, limit: usize) -> Result<usize> {
        match position.index() {
            Some(index) if index <= limit => Ok(index),
            _ => Err(SeqError::OutOfRange {
                index: position.offset(),
                len: self.len,
            }),
        }
    }
}

impl<T, A: Allocator> Drop for DynSeq<T, A> {
    fn drop(&mut self) {
        self.clear();
        // The buffer releases its block when it drops.
    }
}

impl<T, A: Allocator + Default> Default for DynSeq<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Clone, A: Allocator + Clone> Clone for DynSeq<T, A> {
    fn clone(&self) -> Self {
        self.try_clone().unwrap_or_else(|e| fail(e))
    }

    fn clone_from(&mut self, source: &Self) {
        self.try_assign_from(source).unwrap_or_else(|e| fail(e))
    }
}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for DynSeq<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Deref for DynSeq<T, A> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> DerefMut for DynSeq<T, A> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, A: Allocator> AsRef<[T]> for DynSeq<T, A> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator> Index<usize> for DynSeq<T, A> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T, A: Allocator> IndexMut<usize> for DynSeq<T, A> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<T, U, A: Allocator, B: Allocator> PartialEq<DynSeq<U, B>> for DynSeq<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &DynSeq<U, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, A: Allocator> Eq for DynSeq<T, A> {}

impl<T, U, A: Allocator> PartialEq<[U]> for DynSeq<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, A: Allocator> PartialEq<&[U]> for DynSeq<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &&[U]) -> bool {
        self.as_slice() == *other
    }
}

impl<T, U, A: Allocator, const N: usize> PartialEq<[U; N]> for DynSeq<T, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; N]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialOrd, A: Allocator> PartialOrd for DynSeq<T, A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.as_slice().partial_cmp(other.as_slice())
    }
}

impl<T: Ord, A: Allocator> Ord for DynSeq<T, A> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_slice().cmp(other.as_slice())
    }
}

impl<T: Hash, A: Allocator> Hash for DynSeq<T, A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize> From<[T; N]> for DynSeq<T, Global> {
    fn from(values: [T; N]) -> Self {
        let mut seq = Self::with_capacity(N).unwrap_or_else(|e| fail(e));
        let mut values = values.into_iter();
        seq.fill_tail(N, || match values.next() {
            Some(value) => value,
            None => unreachable!("array yields exactly N values"),
        });
        seq
    }
}

impl<T: Clone> From<&[T]> for DynSeq<T, Global> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values).unwrap_or_else(|e| fail(e))
    }
}

impl<T> FromIterator<T> for DynSeq<T, Global> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, Global).unwrap_or_else(|e| fail(e))
    }
}

impl<T, A: Allocator> Extend<T> for DynSeq<T, A> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        let wanted = self.len.saturating_add(iter.size_hint().0);
        if wanted > self.capacity() {
            let target = wanted.max(grown_capacity::<T>(self.capacity()));
            self.reserve(target).unwrap_or_else(|e| fail(e));
        }
        for value in iter {
            self.push_back(value).unwrap_or_else(|e| fail(e));
        }
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a DynSeq<T, A> {
    type Item = &'a T;
    type IntoIter = Cursor<'a, T, Shared>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator> IntoIterator for &'a mut DynSeq<T, A> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator> IntoIterator for DynSeq<T, A> {
    type Item = T;
    type IntoIter = IntoIter<T, A>;

    fn into_iter(self) -> IntoIter<T, A> {
        let seq = ManuallyDrop::new(self);
        // SAFETY: `seq` is never dropped, so the buffer has exactly one owner.
        let buf = unsafe { ptr::read(&seq.buf) };
        IntoIter {
            buf,
            front: 0,
            back: seq.len,
        }
    }
}

/// Owning iterator over the values of a [`DynSeq`]
pub struct IntoIter<T, A: Allocator = Global> {
    buf: RawBuffer<T, A>,
    front: usize,
    back: usize,
}

impl<T, A: Allocator> IntoIter<T, A> {
    /// The values not yet yielded
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [front, back) are live.
        unsafe {
            core::slice::from_raw_parts(self.buf.base().as_ptr().add(self.front), self.back - self.front)
        }
    }
}

impl<T, A: Allocator> Iterator for IntoIter<T, A> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        let index = self.front;
        self.front += 1;
        // SAFETY: the slot is live and now outside [front, back).
        Some(unsafe { self.buf.allocator().extract(self.buf.slot(index)) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, A: Allocator> DoubleEndedIterator for IntoIter<T, A> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: the slot is live and now outside [front, back).
        Some(unsafe { self.buf.allocator().extract(self.buf.slot(self.back)) })
    }
}

impl<T, A: Allocator> ExactSizeIterator for IntoIter<T, A> {}

impl<T, A: Allocator> FusedIterator for IntoIter<T, A> {}

impl<T: fmt::Debug, A: Allocator> fmt::Debug for IntoIter<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator> Drop for IntoIter<T, A> {
    fn drop(&mut self) {
        let (front, back) = (self.front, self.back);
        self.front = back;
        // SAFETY: slots [front, back) are live and no longer reachable.
        unsafe { self.buf.destroy_range(front, back) };
    }
}
