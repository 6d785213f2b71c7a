//! Failure-path tests: panicking clones, injected allocation failures and
//! drop accounting. Every failing operation must leave the container exactly
//! as it was, and every value must be dropped exactly once.

use dynseq_core::{DynSeq, SeqError, TrackingAllocator};
use std::cell::Cell;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

/// Shared counters for a family of [`Fragile`] values
#[derive(Debug, Default)]
struct Census {
    live: Cell<usize>,
    drops: Cell<usize>,
    /// Clones allowed before `clone` panics; `None` means unlimited
    clone_budget: Cell<Option<usize>>,
}

/// Value whose clone can be made to panic, and which reports its drops
#[derive(Debug)]
struct Fragile {
    id: u32,
    census: Rc<Census>,
}

impl Fragile {
    fn new(id: u32, census: &Rc<Census>) -> Self {
        census.live.set(census.live.get() + 1);
        Self {
            id,
            census: Rc::clone(census),
        }
    }
}

impl Clone for Fragile {
    fn clone(&self) -> Self {
        if let Some(budget) = self.census.clone_budget.get() {
            if budget == 0 {
                panic!("clone budget exhausted at value {}", self.id);
            }
            self.census.clone_budget.set(Some(budget - 1));
        }
        Fragile::new(self.id, &self.census)
    }
}

impl Drop for Fragile {
    fn drop(&mut self) {
        self.census.live.set(self.census.live.get() - 1);
        self.census.drops.set(self.census.drops.get() + 1);
    }
}

impl PartialEq for Fragile {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

fn fragile_seq(
    ids: &[u32],
    census: &Rc<Census>,
    alloc: &TrackingAllocator,
) -> DynSeq<Fragile, TrackingAllocator> {
    let mut seq = DynSeq::new_in(alloc.clone());
    for &id in ids {
        seq.push_back(Fragile::new(id, census)).unwrap();
    }
    seq
}

fn ids(seq: &DynSeq<Fragile, TrackingAllocator>) -> Vec<u32> {
    seq.iter().map(|f| f.id).collect()
}

#[test]
fn test_clone_panic_rolls_back() {
    let census = Rc::new(Census::default());
    let alloc = TrackingAllocator::new();
    let source = fragile_seq(&[1, 2, 3, 4], &census, &alloc);
    let before = alloc.stats();

    census.clone_budget.set(Some(2));
    let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
    assert!(result.is_err());
    census.clone_budget.set(None);

    // The two finished clones were dropped and their block released
    assert_eq!(census.live.get(), 4);
    assert_eq!(census.drops.get(), 2);
    let after = alloc.stats();
    assert_eq!(after.live_slots, before.live_slots);
    assert_eq!(after.live_blocks(), before.live_blocks());
    assert_eq!(after.live_values(), 4);
    assert_eq!(ids(&source), [1, 2, 3, 4]);

    drop(source);
    assert_eq!(census.live.get(), 0);
    assert!(alloc.stats().is_balanced());
}

#[test]
fn test_clone_from_panic_leaves_target() {
    let census = Rc::new(Census::default());
    let alloc = TrackingAllocator::new();
    let source = fragile_seq(&[7, 8, 9], &census, &alloc);
    let mut target = fragile_seq(&[1], &census, &alloc);
    let generation = target.generation();

    census.clone_budget.set(Some(1));
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    census.clone_budget.set(None);

    assert_eq!(ids(&target), [1]);
    assert_eq!(target.generation(), generation);
    assert_eq!(census.live.get(), 4);

    target.clone_from(&source);
    assert_eq!(ids(&target), [7, 8, 9]);
    assert_eq!(census.live.get(), 6);

    drop(source);
    drop(target);
    assert!(alloc.stats().is_balanced());
}

#[test]
fn test_try_assign_allocation_failure() {
    let alloc = TrackingAllocator::new();
    let source = {
        let mut s = DynSeq::new_in(alloc.clone());
        s.push_back(String::from("a")).unwrap();
        s
    };
    let mut target = DynSeq::new_in(alloc.clone());
    target.push_back(String::from("keep")).unwrap();

    alloc.fail_after(0);
    let err = target.try_assign_from(&source).unwrap_err();
    alloc.disarm();

    assert!(matches!(err, SeqError::AllocationFailure { .. }));
    assert_eq!(target, ["keep"]);
}

#[test]
fn test_allocation_failure_keeps_contents() {
    let census = Rc::new(Census::default());
    let alloc = TrackingAllocator::new();
    let mut seq = fragile_seq(&[1, 2, 3, 4], &census, &alloc);
    assert_eq!(seq.capacity(), 4);
    let data = seq.data();
    let generation = seq.generation();

    alloc.fail_after(0);

    // push_back on a full sequence must grow
    assert!(matches!(
        seq.push_back(Fragile::new(5, &census)),
        Err(SeqError::AllocationFailure { slots: 8, .. })
    ));
    // The rejected value was dropped, not leaked
    assert_eq!(census.live.get(), 4);

    assert!(seq.insert(seq.begin(), Fragile::new(0, &census)).is_err());
    assert!(seq.reserve(64).is_err());
    assert!(seq.try_clone().is_err());

    seq.pop_back();
    assert!(seq.shrink_to_fit().is_err());

    assert_eq!(ids(&seq), [1, 2, 3]);
    assert_eq!(seq.capacity(), 4);
    assert_eq!(seq.data(), data);
    assert_eq!(seq.generation(), generation);
    assert_eq!(alloc.stats().failed_allocations, 5);

    alloc.disarm();
    drop(seq);
    assert_eq!(census.live.get(), 0);
    assert!(alloc.stats().is_balanced());
}

#[test]
fn test_every_value_dropped_once() {
    let census = Rc::new(Census::default());
    let alloc = TrackingAllocator::new();
    let mut seq = fragile_seq(&(0..16).collect::<Vec<_>>(), &census, &alloc);

    seq.erase(seq.begin() + 3usize).unwrap();
    assert_eq!(census.drops.get(), 1);

    seq.erase_range(seq.begin() + 2usize, seq.begin() + 6usize)
        .unwrap();
    assert_eq!(census.drops.get(), 5);

    seq.truncate(8);
    assert_eq!(census.drops.get(), 8);
    assert_eq!(ids(&seq), [0, 1, 7, 8, 9, 10, 11, 12]);

    let mut iter = seq.into_iter();
    let first = iter.next().unwrap();
    let last = iter.next_back().unwrap();
    drop(iter);
    assert_eq!(census.drops.get(), 14);
    assert_eq!((first.id, last.id), (0, 12));

    drop((first, last));
    assert_eq!(census.live.get(), 0);
    assert_eq!(census.drops.get(), 16);
    assert!(alloc.stats().is_balanced());
}

#[test]
fn test_panicking_generator_keeps_prefix() {
    let alloc = TrackingAllocator::new();
    let mut seq: DynSeq<String, _> = DynSeq::new_in(alloc.clone());
    seq.push_back(String::from("base")).unwrap();

    let mut made = 0;
    let result = catch_unwind(AssertUnwindSafe(|| {
        seq.resize_with(6, || {
            made += 1;
            if made == 3 {
                panic!("generator failed");
            }
            format!("gen-{}", made)
        })
    }));
    assert!(result.is_err());

    // Values built before the panic stay, with len tracking them
    assert_eq!(seq, ["base", "gen-1", "gen-2"]);
    assert_eq!(seq.capacity(), 6);

    drop(seq);
    assert!(alloc.stats().is_balanced());
}

#[test]
fn test_emplace_panic_leaves_len() {
    let mut seq = DynSeq::new();
    seq.push_back(1u8).unwrap();

    let result = catch_unwind(AssertUnwindSafe(|| {
        seq.emplace_back_with(|| panic!("constructor failed")).map(|_| ())
    }));
    assert!(result.is_err());
    assert_eq!(seq, [1]);
}

#[test]
fn test_take_then_drop_both() {
    let census = Rc::new(Census::default());
    let alloc = TrackingAllocator::new();
    let mut source = fragile_seq(&[1, 2], &census, &alloc);

    let moved = source.take();
    assert_eq!(ids(&moved), [1, 2]);
    assert!(source.is_empty());

    drop(source);
    assert_eq!(census.drops.get(), 0);
    drop(moved);
    assert_eq!(census.drops.get(), 2);
    assert!(alloc.stats().is_balanced());
}
