//! Owned raw storage blocks
//!
//! [`RawBuffer`] owns one allocator block and its capacity, nothing more: it
//! never knows how many slots hold live values. The containers track that and
//! tell the buffer which prefix to copy or relocate.

use crate::allocator::Allocator;
use crate::Result;
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// An exclusively owned block of `capacity` uninitialised-or-live slots
pub(crate) struct RawBuffer<T, A: Allocator> {
    block: Option<NonNull<T>>,
    capacity: usize,
    alloc: A,
    _owns: PhantomData<T>,
}

// SAFETY: the block is uniquely owned, like a `Box<[T]>`.
unsafe impl<T: Send, A: Allocator + Send> Send for RawBuffer<T, A> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync, A: Allocator + Sync> Sync for RawBuffer<T, A> {}

impl<T, A: Allocator> RawBuffer<T, A> {
    /// Empty buffer, no block
    pub(crate) const fn new_in(alloc: A) -> Self {
        Self {
            block: None,
            capacity: 0,
            alloc,
            _owns: PhantomData,
        }
    }

    /// Buffer with exactly `capacity` slots
    pub(crate) fn with_capacity_in(capacity: usize, alloc: A) -> Result<Self> {
        let mut buf = Self::new_in(alloc);
        if capacity > 0 {
            buf.block = Some(buf.alloc.allocate::<T>(capacity)?);
            buf.capacity = capacity;
        }
        Ok(buf)
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Start of the block, or null when nothing is allocated
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.block.map_or(ptr::null_mut(), NonNull::as_ptr)
    }

    /// Start of the block, or a dangling pointer valid for empty slices
    pub(crate) fn base(&self) -> NonNull<T> {
        self.block.unwrap_or(NonNull::dangling())
    }

    /// Pointer to slot `index`
    ///
    /// # Safety
    ///
    /// `index < capacity`.
    pub(crate) unsafe fn slot(&self, index: usize) -> NonNull<T> {
        debug_assert!(index < self.capacity);
        // SAFETY: index is within the allocated block.
        unsafe { NonNull::new_unchecked(self.base().as_ptr().add(index)) }
    }

    /// Destroy the values in slots `[from, to)` through the allocator
    ///
    /// # Safety
    ///
    /// Slots `[from, to)` must hold live values that are not used afterwards.
    pub(crate) unsafe fn destroy_range(&self, from: usize, to: usize) {
        for index in from..to {
            // SAFETY: caller guarantees the slot is live and in bounds.
            unsafe { self.alloc.destroy(self.slot(index)) };
        }
    }

    /// Move the first `len` values into a fresh block of `new_capacity` slots
    ///
    /// Values are relocated bitwise, so nothing can fail once the block is
    /// allocated. On allocation failure the buffer is left untouched.
    pub(crate) fn relocate(&mut self, len: usize, new_capacity: usize) -> Result<()> {
        debug_assert!(len <= self.capacity && len <= new_capacity);

        #[cfg(feature = "logging")]
        debug!(
            "Relocating {} values from {} to {} slots",
            len, self.capacity, new_capacity
        );

        let fresh = if new_capacity == 0 {
            None
        } else {
            let block = self.allocate_logged(new_capacity)?;
            // SAFETY: both blocks hold at least `len` slots and are distinct.
            unsafe { ptr::copy_nonoverlapping(self.base().as_ptr(), block.as_ptr(), len) };
            Some(block)
        };

        self.release();
        self.block = fresh;
        self.capacity = new_capacity;
        Ok(())
    }

    /// Copy of this buffer's capacity holding clones of the first `len` values
    pub(crate) fn clone_in(&self, len: usize, alloc: A) -> Result<Self>
    where
        T: Clone,
    {
        // SAFETY: the first `len` slots of our block are live.
        let block = unsafe { clone_block(&alloc, self.base(), len, self.capacity)? };
        Ok(Self {
            block,
            capacity: self.capacity,
            alloc,
            _owns: PhantomData,
        })
    }

    /// Exchange blocks and capacities with `other`; allocators stay put
    pub(crate) fn swap_block(&mut self, other: &mut Self) {
        mem::swap(&mut self.block, &mut other.block);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Give the block back to the allocator
    ///
    /// Any live values must already have been destroyed or moved out.
    pub(crate) fn release(&mut self) {
        if let Some(block) = self.block.take() {
            // SAFETY: block was allocated with `capacity` slots.
            unsafe { self.alloc.deallocate(block, self.capacity) };
        }
        self.capacity = 0;
    }

    fn allocate_logged(&self, slots: usize) -> Result<NonNull<T>> {
        self.alloc.allocate::<T>(slots).map_err(|e| {
            #[cfg(feature = "logging")]
            warn!("Allocation of {} slots failed: {:?}", slots, e);
            e
        })
    }
}

impl<T, A: Allocator> Drop for RawBuffer<T, A> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Allocate `slots` slots from `alloc` and clone `len` values from `src` into
/// them, in order
///
/// On failure every clone already built is destroyed and the block released
/// before the error (or panic) reaches the caller.
///
/// # Safety
///
/// `src` must point to `len` live values.
unsafe fn clone_block<T: Clone, A: Allocator>(
    alloc: &A,
    src: NonNull<T>,
    len: usize,
    slots: usize,
) -> Result<Option<NonNull<T>>> {
    if slots == 0 {
        return Ok(None);
    }

    let block = alloc.allocate::<T>(slots).map_err(|e| {
        #[cfg(feature = "logging")]
        warn!("Allocation of {} slots failed: {:?}", slots, e);
        e
    })?;

    let mut partial = PartialBlock {
        alloc,
        block,
        slots,
        built: 0,
    };
    while partial.built < len {
        // SAFETY: `built < len` keeps both reads and writes in bounds.
        unsafe {
            let value = (*src.as_ptr().add(partial.built)).clone();
            alloc.construct(NonNull::new_unchecked(block.as_ptr().add(partial.built)), value);
        }
        partial.built += 1;
    }

    Ok(Some(partial.finish()))
}

/// A block being filled; dropping it undoes the work
struct PartialBlock<'a, T, A: Allocator> {
    alloc: &'a A,
    block: NonNull<T>,
    slots: usize,
    built: usize,
}

impl<T, A: Allocator> PartialBlock<'_, T, A> {
    fn finish(self) -> NonNull<T> {
        let block = self.block;
        mem::forget(self);
        block
    }
}

impl<T, A: Allocator> Drop for PartialBlock<'_, T, A> {
    fn drop(&mut self) {
        #[cfg(feature = "logging")]
        warn!(
            "Rolling back partially built block: destroying {} of {} slots",
            self.built, self.slots
        );

        for index in 0..self.built {
            // SAFETY: the first `built` slots were constructed by us.
            unsafe {
                self.alloc
                    .destroy(NonNull::new_unchecked(self.block.as_ptr().add(index)))
            };
        }
        // SAFETY: block was allocated with `slots` slots.
        unsafe { self.alloc.deallocate(self.block, self.slots) };
    }
}
