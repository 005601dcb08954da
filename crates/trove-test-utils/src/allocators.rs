//! Allocator mocks for failure injection and leak tracking.

// Both mocks implement an `unsafe trait` and only forward to an inner allocator.
#![allow(unsafe_code)]

use std::alloc::Layout;
use std::cell::{Cell, RefCell};
use std::ptr::NonNull;

use indexmap::IndexMap;
use trove_alloc::{RawAllocator, SystemAllocator};
use trove_core::AllocError;

/// Allocator that refuses requests on demand.
///
/// Wraps `A` (the system allocator by default). Until armed with
/// [`fail_after`](Self::fail_after) or [`fail_above`](Self::fail_above)
/// it forwards everything. `release` always forwards.
pub struct FaultyAllocator<A = SystemAllocator> {
    inner: A,
    /// Successful calls still permitted before every call fails.
    budget: Cell<Option<u64>>,
    /// Requests larger than this many bytes fail.
    max_bytes: Cell<Option<usize>>,
    injected: Cell<u64>,
}

impl FaultyAllocator<SystemAllocator> {
    pub fn new() -> Self {
        Self::wrapping(SystemAllocator)
    }
}

impl Default for FaultyAllocator<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RawAllocator> FaultyAllocator<A> {
    pub fn wrapping(inner: A) -> Self {
        Self {
            inner,
            budget: Cell::new(None),
            max_bytes: Cell::new(None),
            injected: Cell::new(0),
        }
    }

    /// Allow `n` more successful `allocate`/`reallocate` calls, then fail.
    pub fn fail_after(&self, n: u64) {
        self.budget.set(Some(n));
    }

    /// Fail the very next `allocate`/`reallocate` call (and all after it).
    pub fn fail_next(&self) {
        self.fail_after(0);
    }

    /// Fail any request for more than `bytes` bytes.
    pub fn fail_above(&self, bytes: usize) {
        self.max_bytes.set(Some(bytes));
    }

    /// Disarm: forward everything again.
    pub fn heal(&self) {
        self.budget.set(None);
        self.max_bytes.set(None);
    }

    /// Number of failures injected so far.
    pub fn injected_failures(&self) -> u64 {
        self.injected.get()
    }

    /// Decide whether a request for `size` bytes should fail, consuming
    /// budget if it succeeds.
    fn should_fail(&self, size: usize) -> bool {
        if self.max_bytes.get().is_some_and(|max| size > max) {
            self.injected.set(self.injected.get() + 1);
            return true;
        }
        match self.budget.get() {
            Some(0) => {
                self.injected.set(self.injected.get() + 1);
                true
            }
            Some(n) => {
                self.budget.set(Some(n - 1));
                false
            }
            None => false,
        }
    }
}

unsafe impl<A: RawAllocator> RawAllocator for FaultyAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if self.should_fail(layout.size()) {
            return Err(AllocError::new(layout.size(), layout.align()));
        }
        self.inner.allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        if self.should_fail(new_size) {
            return Err(AllocError::new(new_size, old.align()));
        }
        unsafe { self.inner.reallocate(ptr, old, new_size) }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        unsafe { self.inner.release(ptr, layout) }
    }
}

/// Allocator that keeps a ledger of live blocks.
///
/// Panics on releasing or reallocating a block it never handed out (or
/// with the wrong layout), which turns double frees into test failures.
/// Zero-size blocks are not tracked.
pub struct TrackingAllocator<A = SystemAllocator> {
    inner: A,
    /// Address → layout of every live non-empty block, in allocation order.
    live: RefCell<IndexMap<usize, Layout>>,
}

impl TrackingAllocator<SystemAllocator> {
    pub fn new() -> Self {
        Self::wrapping(SystemAllocator)
    }
}

impl Default for TrackingAllocator<SystemAllocator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: RawAllocator> TrackingAllocator<A> {
    pub fn wrapping(inner: A) -> Self {
        Self {
            inner,
            live: RefCell::new(IndexMap::new()),
        }
    }

    /// Number of live blocks.
    pub fn live_blocks(&self) -> usize {
        self.live.borrow().len()
    }

    /// Total bytes across live blocks.
    pub fn live_bytes(&self) -> usize {
        self.live.borrow().values().map(|l| l.size()).sum()
    }

    /// Layouts of live blocks in allocation order.
    pub fn live_layouts(&self) -> Vec<Layout> {
        self.live.borrow().values().copied().collect()
    }

    /// Panic if any block is still live.
    pub fn assert_no_leaks(&self) {
        let live = self.live.borrow();
        assert!(
            live.is_empty(),
            "{} block(s) leaked: {:?}",
            live.len(),
            live.values().collect::<Vec<_>>()
        );
    }

    fn record(&self, block: NonNull<u8>, layout: Layout) {
        if layout.size() != 0 {
            self.live.borrow_mut().insert(block.as_ptr().addr(), layout);
        }
    }

    fn forget(&self, block: NonNull<u8>, layout: Layout) {
        if layout.size() == 0 {
            return;
        }
        let addr = block.as_ptr().addr();
        match self.live.borrow_mut().shift_remove(&addr) {
            Some(recorded) => assert_eq!(
                recorded, layout,
                "block {addr:#x} released with a different layout"
            ),
            None => panic!("block {addr:#x} was not allocated here or was already released"),
        }
    }
}

unsafe impl<A: RawAllocator> RawAllocator for TrackingAllocator<A> {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        let block = self.inner.allocate(layout)?;
        self.record(block, layout);
        Ok(block)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let block = unsafe { self.inner.reallocate(ptr, old, new_size)? };
        if let Some(old_block) = ptr {
            self.forget(old_block, old);
        }
        if let Ok(new_layout) = Layout::from_size_align(new_size, old.align()) {
            self.record(block, new_layout);
        }
        Ok(block)
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        if let Some(block) = ptr {
            self.forget(block, layout);
        }
        unsafe { self.inner.release(ptr, layout) }
    }
}
