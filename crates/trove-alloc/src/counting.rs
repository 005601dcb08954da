//! Allocation statistics decorator.
//!
//! [`CountingAllocator`] wraps any [`RawAllocator`] and records how many
//! calls it served and how many bytes are live, so callers can profile a
//! workload or check that containers give back everything they took.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::Cell;
use std::ptr::NonNull;

use trove_core::AllocError;

use crate::allocator::RawAllocator;

/// Counters collected by a [`CountingAllocator`].
///
/// All counts are cumulative since creation or the last
/// [`reset_stats`](CountingAllocator::reset_stats).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AllocStats {
    /// Successful `allocate` calls, and `reallocate` calls without a block.
    pub allocations: u64,
    /// Successful `reallocate` calls on an existing block.
    pub reallocations: u64,
    /// `release` calls with a non-null pointer.
    pub releases: u64,
    /// Calls that returned an error.
    pub failures: u64,
    /// Bytes currently handed out.
    pub live_bytes: usize,
    /// High-water mark of `live_bytes`.
    pub peak_bytes: usize,
}

impl AllocStats {
    fn add_live(&mut self, bytes: usize) {
        self.live_bytes += bytes;
        self.peak_bytes = self.peak_bytes.max(self.live_bytes);
    }

    fn sub_live(&mut self, bytes: usize) {
        self.live_bytes = self.live_bytes.saturating_sub(bytes);
    }
}

/// Decorator that counts the calls it forwards to `A`.
#[derive(Debug, Default)]
pub struct CountingAllocator<A> {
    inner: A,
    stats: Cell<AllocStats>,
}

impl<A: RawAllocator> CountingAllocator<A> {
    /// Wrap `inner`.
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            stats: Cell::new(AllocStats::default()),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> AllocStats {
        self.stats.get()
    }

    /// Zero every counter, including live and peak bytes.
    pub fn reset_stats(&self) {
        self.stats.set(AllocStats::default());
    }

    /// The wrapped allocator.
    pub fn inner(&self) -> &A {
        &self.inner
    }

    fn update(&self, f: impl FnOnce(&mut AllocStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }
}

// SAFETY: every call is forwarded unchanged to `inner`.
unsafe impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let result = self.inner.allocate(layout);
        self.update(|s| match result {
            Ok(_) => {
                s.allocations += 1;
                s.add_live(layout.size());
            }
            Err(_) => s.failures += 1,
        });
        result
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: forwarded caller contract.
        let result = unsafe { self.inner.reallocate(ptr, old, new_size) };
        self.update(|s| match result {
            Ok(_) => {
                // Growing from nothing is a fresh allocation.
                match ptr {
                    Some(_) => {
                        s.reallocations += 1;
                        s.sub_live(old.size());
                    }
                    None => s.allocations += 1,
                }
                s.add_live(new_size);
            }
            Err(_) => s.failures += 1,
        });
        result
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        if ptr.is_some() {
            self.update(|s| {
                s.releases += 1;
                s.sub_live(layout.size());
            });
        }
        // SAFETY: forwarded caller contract.
        unsafe { self.inner.release(ptr, layout) }
    }
}
