//! Allocation strategies
//!
//! An [`Allocator`] hands out raw blocks of element slots and builds or tears
//! down values in place. Containers never touch the heap directly; every
//! block, construction and destruction goes through their allocator, which is
//! what lets [`TrackingAllocator`] account for each of them.

use crate::constants::max_size;
use crate::error::SeqError;
use alloc::rc::Rc;
use core::alloc::Layout;
use core::cell::Cell;
use core::ptr::{self, NonNull};
use serde::{Deserialize, Serialize};

/// Strategy object responsible for raw memory and in-place construction
///
/// Blocks are typed by the element type `T` and sized in slots, not bytes.
///
/// # Safety contract
///
/// `deallocate` must only receive a block returned by `allocate` on the same
/// allocator (or a clone of it) with the same `slots`. `construct` requires an
/// allocated, currently uninitialised slot; `destroy` requires a slot holding
/// a live value.
pub trait Allocator {
    /// Allocate an uninitialised block of `slots` elements
    fn allocate<T>(&self, slots: usize) -> Result<NonNull<T>, SeqError>;

    /// Release a block previously returned by [`Allocator::allocate`]
    ///
    /// # Safety
    ///
    /// `block` must come from `allocate::<T>(slots)` on this allocator and
    /// must not be used afterwards.
    unsafe fn deallocate<T>(&self, block: NonNull<T>, slots: usize);

    /// Move `value` into an uninitialised slot
    ///
    /// # Safety
    ///
    /// `slot` must be valid for writes and hold no live value.
    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: caller guarantees the slot is writable and uninitialised.
        unsafe { slot.as_ptr().write(value) }
    }

    /// Move the value out of `slot`, leaving it uninitialised
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not used afterwards.
    unsafe fn extract<T>(&self, slot: NonNull<T>) -> T {
        // SAFETY: caller guarantees the slot holds a live value.
        unsafe { slot.as_ptr().read() }
    }

    /// Drop the value held in `slot`, leaving it uninitialised
    ///
    /// # Safety
    ///
    /// `slot` must hold a live value that is not used afterwards.
    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // SAFETY: caller guarantees the slot holds a live value.
        unsafe { ptr::drop_in_place(slot.as_ptr()) }
    }
}

/// Compute the layout of a block of `slots` elements of `T`
pub(crate) fn block_layout<T>(slots: usize) -> Result<Layout, SeqError> {
    let max = max_size::<T>();
    if slots > max {
        return Err(SeqError::LengthExceeded {
            requested: slots,
            max,
        });
    }
    Layout::array::<T>(slots).map_err(|_| SeqError::LengthExceeded {
        requested: slots,
        max,
    })
}

/// The platform's global allocator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

impl Allocator for Global {
    fn allocate<T>(&self, slots: usize) -> Result<NonNull<T>, SeqError> {
        let layout = block_layout::<T>(slots)?;
        if layout.size() == 0 {
            return Ok(NonNull::dangling());
        }

        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc::alloc(layout) };
        NonNull::new(raw.cast::<T>()).ok_or(SeqError::AllocationFailure {
            slots,
            bytes: layout.size(),
        })
    }

    unsafe fn deallocate<T>(&self, block: NonNull<T>, slots: usize) {
        // Any block we handed out had a valid layout.
        let Ok(layout) = Layout::array::<T>(slots) else {
            return;
        };
        if layout.size() == 0 {
            return;
        }

        // SAFETY: caller guarantees `block` came from `allocate::<T>(slots)`.
        unsafe { alloc::alloc::dealloc(block.as_ptr().cast::<u8>(), layout) }
    }
}

/// Snapshot of the counters kept by a [`TrackingAllocator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocStats {
    /// Successful block allocations
    pub allocations: usize,

    /// Block releases
    pub deallocations: usize,

    /// Allocation requests refused (including injected failures)
    pub failed_allocations: usize,

    /// Slots currently allocated across all live blocks
    pub live_slots: usize,

    /// Highest value `live_slots` has reached
    pub peak_slots: usize,

    /// Values constructed in place
    pub constructed: usize,

    /// Values destroyed in place or moved out of the container
    pub destroyed: usize,
}

impl AllocStats {
    /// Blocks allocated and not yet released
    pub fn live_blocks(&self) -> usize {
        self.allocations - self.deallocations
    }

    /// Values constructed and not yet destroyed
    pub fn live_values(&self) -> usize {
        self.constructed - self.destroyed
    }

    /// True when every block was released and every value destroyed
    pub fn is_balanced(&self) -> bool {
        self.live_blocks() == 0 && self.live_slots == 0 && self.live_values() == 0
    }
}

#[derive(Debug, Default)]
struct Ledger {
    stats: Cell<AllocStats>,
    /// Remaining allocations before injected failures start
    budget: Cell<Option<usize>>,
}

impl Ledger {
    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

/// Allocator that counts every block and value it manages
///
/// Clones share one ledger, so a container and every copy made from it report
/// into the same [`AllocStats`]. A failure budget can be armed to make
/// allocations fail on demand.
#[derive(Debug, Clone, Default)]
pub struct TrackingAllocator<A: Allocator = Global> {
    inner: A,
    ledger: Rc<Ledger>,
}

impl TrackingAllocator<Global> {
    /// Create a tracking allocator over the global allocator
    pub fn new() -> Self {
        Self::default()
    }
}

impl<A: Allocator> TrackingAllocator<A> {
    /// Create a tracking allocator over `inner`
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            ledger: Rc::new(Ledger::default()),
        }
    }

    /// Current counters
    pub fn stats(&self) -> AllocStats {
        self.ledger.stats.get()
    }

    /// Let the next `successes` allocations through, then refuse every one
    pub fn fail_after(&self, successes: usize) {
        self.ledger.budget.set(Some(successes));
    }

    /// Stop injecting allocation failures
    pub fn disarm(&self) {
        self.ledger.budget.set(None);
    }
}

impl<A: Allocator> Allocator for TrackingAllocator<A> {
    fn allocate<T>(&self, slots: usize) -> Result<NonNull<T>, SeqError> {
        if let Some(remaining) = self.ledger.budget.get() {
            if remaining == 0 {
                self.ledger.update(|s| s.failed_allocations += 1);
                let bytes = slots.saturating_mul(core::mem::size_of::<T>());
                return Err(SeqError::AllocationFailure { slots, bytes });
            }
            self.ledger.budget.set(Some(remaining - 1));
        }

        match self.inner.allocate::<T>(slots) {
            Ok(block) => {
                self.ledger.update(|s| {
                    s.allocations += 1;
                    s.live_slots += slots;
                    s.peak_slots = s.peak_slots.max(s.live_slots);
                });
                Ok(block)
            }
            Err(e) => {
                self.ledger.update(|s| s.failed_allocations += 1);
                Err(e)
            }
        }
    }

    unsafe fn deallocate<T>(&self, block: NonNull<T>, slots: usize) {
        self.ledger.update(|s| {
            s.deallocations += 1;
            s.live_slots -= slots;
        });
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.deallocate(block, slots) }
    }

    unsafe fn construct<T>(&self, slot: NonNull<T>, value: T) {
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.construct(slot, value) };
        self.ledger.update(|s| s.constructed += 1);
    }

    unsafe fn extract<T>(&self, slot: NonNull<T>) -> T {
        self.ledger.update(|s| s.destroyed += 1);
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.extract(slot) }
    }

    unsafe fn destroy<T>(&self, slot: NonNull<T>) {
        // Count first: a panicking Drop still ends the value's life.
        self.ledger.update(|s| s.destroyed += 1);
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.destroy(slot) }
    }
}
