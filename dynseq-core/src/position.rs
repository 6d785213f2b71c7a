//! Lifetime-free positions into a sequence
//!
//! A [`Position`] is what `begin`, `end`, `insert` and `erase` hand back. It
//! does not borrow the sequence, so it can be fed straight back into a
//! mutating call. Each position carries the generation of the sequence it was
//! taken from. Generations are unique across all sequences in the process, so
//! a position from another sequence never matches; any reallocation, insert
//! or erase moves the sequence to a fresh generation and older positions are
//! refused with
//! [`SeqError::InvalidatedPosition`](crate::SeqError::InvalidatedPosition).

use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};
use core::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// A generation no other sequence has used
pub(crate) fn fresh_generation() -> u64 {
    NEXT_GENERATION.fetch_add(1, AtomicOrdering::Relaxed)
}

/// Random-access position within a [`DynSeq`](crate::DynSeq)
///
/// A position may point anywhere in the `isize` range and is only checked
/// against the sequence's bounds when it is used. Arithmetic that leaves the
/// `isize` range panics.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    offset: isize,
    generation: u64,
}

impl Position {
    pub(crate) const fn new(offset: isize, generation: u64) -> Self {
        Self { offset, generation }
    }

    /// Element offset from the start of the sequence
    pub const fn offset(&self) -> isize {
        self.offset
    }

    /// Generation of the sequence this position was taken from
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Offset as an index, if it is not negative
    pub fn index(&self) -> Option<usize> {
        usize::try_from(self.offset).ok()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({}@{})", self.offset, self.generation)
    }
}

/// Positions from different generations are unordered
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self.generation != other.generation {
            return None;
        }
        Some(self.offset.cmp(&other.offset))
    }
}

#[track_caller]
fn signed(rhs: usize) -> isize {
    match isize::try_from(rhs) {
        Ok(n) => n,
        Err(_) => panic!("position step {} outside the isize range", rhs),
    }
}

impl Position {
    #[track_caller]
    fn shifted(self, rhs: isize) -> Position {
        match self.offset.checked_add(rhs) {
            Some(offset) => Position::new(offset, self.generation),
            None => panic!(
                "position {} moved by {} outside the isize range",
                self.offset, rhs
            ),
        }
    }

    #[track_caller]
    fn shifted_back(self, rhs: isize) -> Position {
        match self.offset.checked_sub(rhs) {
            Some(offset) => Position::new(offset, self.generation),
            None => panic!(
                "position {} moved by -{} outside the isize range",
                self.offset, rhs
            ),
        }
    }
}

impl Add<isize> for Position {
    type Output = Position;

    fn add(self, rhs: isize) -> Position {
        self.shifted(rhs)
    }
}

impl Add<usize> for Position {
    type Output = Position;

    fn add(self, rhs: usize) -> Position {
        self.shifted(signed(rhs))
    }
}

impl Sub<isize> for Position {
    type Output = Position;

    fn sub(self, rhs: isize) -> Position {
        self.shifted_back(rhs)
    }
}

impl Sub<usize> for Position {
    type Output = Position;

    fn sub(self, rhs: usize) -> Position {
        self.shifted_back(signed(rhs))
    }
}

/// Signed distance between two positions
impl Sub<Position> for Position {
    type Output = isize;

    fn sub(self, rhs: Position) -> isize {
        self.offset - rhs.offset
    }
}

impl AddAssign<isize> for Position {
    fn add_assign(&mut self, rhs: isize) {
        *self = self.shifted(rhs);
    }
}

impl AddAssign<usize> for Position {
    fn add_assign(&mut self, rhs: usize) {
        *self = self.shifted(signed(rhs));
    }
}

impl SubAssign<isize> for Position {
    fn sub_assign(&mut self, rhs: isize) {
        *self = self.shifted_back(rhs);
    }
}

impl SubAssign<usize> for Position {
    fn sub_assign(&mut self, rhs: usize) {
        *self = self.shifted_back(signed(rhs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let begin = Position::new(0, 3);
        let mut p = begin + 4usize;
        assert_eq!(p.offset(), 4);

        p -= 1isize;
        assert_eq!(p - begin, 3);
        assert_eq!((p - 5usize).offset(), -2);
        assert_eq!((p - 5usize).index(), None);
        assert_eq!(p.generation(), 3);
    }

    #[test]
    fn test_ordering_same_generation() {
        let a = Position::new(1, 0);
        let b = Position::new(2, 0);
        assert!(a < b);
        assert!(b >= a);
        assert_ne!(a, b);
    }

    #[test]
    fn test_ordering_across_generations() {
        let a = Position::new(1, 0);
        let b = Position::new(1, 1);
        assert_eq!(a.partial_cmp(&b), None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_fresh_generations_are_distinct() {
        let first = fresh_generation();
        let second = fresh_generation();
        assert_ne!(first, second);
        assert_ne!(first, 0);
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_huge_unsigned_step_panics() {
        let _ = Position::new(2, 0) + usize::MAX;
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_offset_overflow_panics() {
        let mut p = Position::new(isize::MAX, 0);
        p += 1usize;
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_step_back_overflow_panics() {
        let mut p = Position::new(-1, 0);
        p -= isize::MAX;
        p -= 2usize;
    }
}
