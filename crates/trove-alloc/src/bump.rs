//! Fixed-capacity bump region.
//!
//! A [`BumpAllocator`] owns one contiguous block obtained from the global
//! allocator at construction and hands out sub-blocks by advancing a
//! cursor. Only the most recent block can be resized in place or
//! reclaimed; everything else is reclaimed at once by [`reset`].
//!
//! [`reset`]: BumpAllocator::reset

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::cell::Cell;
use std::fmt;
use std::ptr::NonNull;

use trove_core::AllocError;

use crate::allocator::{dangling, reallocate_by_copy, RawAllocator};

/// A bump-allocated memory region with last-block reclaim.
///
/// Blocks are carved from a single pre-allocated region that is never
/// resized. Requests that do not fit fail with [`AllocError`] rather than
/// spilling elsewhere, which makes the region useful for bounding the
/// memory of a group of containers.
pub struct BumpAllocator {
    /// Start of the backing region.
    base: NonNull<u8>,
    /// Size of the backing region in bytes.
    capacity: usize,
    /// Bump pointer: offset of the first free byte.
    cursor: Cell<usize>,
    /// `(offset, size)` of the most recent block, if it is still live.
    last: Cell<Option<(usize, usize)>>,
}

impl BumpAllocator {
    /// Alignment of the backing region, and the largest alignment served.
    pub const REGION_ALIGN: usize = 16;

    /// Create a region of `capacity` bytes.
    ///
    /// Returns [`AllocError`] if the global allocator cannot provide it.
    pub fn new(capacity: usize) -> Result<Self, AllocError> {
        let layout = Self::region_layout(capacity)?;
        // SAFETY: `region_layout` never produces a zero-size layout.
        let raw = unsafe { alloc::alloc(layout) };
        let base = NonNull::new(raw).ok_or(AllocError::new(layout.size(), layout.align()))?;
        Ok(Self {
            base,
            capacity,
            cursor: Cell::new(0),
            last: Cell::new(None),
        })
    }

    /// Reset the bump pointer to zero without returning the region.
    ///
    /// Requires `&mut self`, so no container can still be borrowing the
    /// allocator and no block handed out earlier can still be in use.
    pub fn reset(&mut self) {
        self.cursor.set(0);
        self.last.set(None);
    }

    /// Bytes handed out so far (including alignment padding).
    pub fn used(&self) -> usize {
        self.cursor.get()
    }

    /// Total size of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes still available past the cursor.
    pub fn remaining(&self) -> usize {
        self.capacity - self.cursor.get()
    }

    fn region_layout(capacity: usize) -> Result<Layout, AllocError> {
        Layout::from_size_align(capacity.max(1), Self::REGION_ALIGN)
            .map_err(|_| AllocError::new(capacity, Self::REGION_ALIGN))
    }

    /// Offset of `ptr` within the region.
    fn offset_of(&self, ptr: NonNull<u8>) -> usize {
        ptr.as_ptr().addr().wrapping_sub(self.base.as_ptr().addr())
    }

    /// Whether `ptr` with `size` bytes is the most recent live block.
    fn is_last(&self, ptr: NonNull<u8>, size: usize) -> Option<usize> {
        let (offset, last_size) = self.last.get()?;
        (offset == self.offset_of(ptr) && last_size == size).then_some(offset)
    }

    /// Carve `size` bytes at `align`, or `None` if the region is exhausted.
    fn bump(&self, size: usize, align: usize) -> Option<usize> {
        let start = self.cursor.get().checked_next_multiple_of(align)?;
        let end = start.checked_add(size)?;
        if end > self.capacity {
            return None;
        }
        self.cursor.set(end);
        self.last.set(Some((start, size)));
        Some(start)
    }

    fn block_at(&self, offset: usize) -> NonNull<u8> {
        // SAFETY: callers only pass offsets produced by `bump`, which are
        // within the region.
        unsafe { self.base.add(offset) }
    }
}

// SAFETY: blocks are disjoint sub-ranges of the owned region (the cursor
// only moves back over the most recent block after it has been released or
// resized), aligned to the requested alignment up to `REGION_ALIGN`.
unsafe impl RawAllocator for BumpAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.align() > Self::REGION_ALIGN {
            return Err(AllocError::new(layout.size(), layout.align()));
        }
        if layout.size() == 0 {
            return Ok(dangling(layout.align()));
        }
        match self.bump(layout.size(), layout.align()) {
            Some(offset) => Ok(self.block_at(offset)),
            None => {
                tracing::debug!(
                    requested = layout.size(),
                    align = layout.align(),
                    used = self.used(),
                    capacity = self.capacity,
                    "bump region exhausted"
                );
                Err(AllocError::new(layout.size(), layout.align()))
            }
        }
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        if let Some(block) = ptr {
            if let Some(offset) = self.is_last(block, old.size()) {
                // Most recent block: grow or shrink in place.
                let end = offset
                    .checked_add(new_size)
                    .filter(|&end| end <= self.capacity);
                if let Some(end) = end {
                    self.cursor.set(end);
                    self.last.set(Some((offset, new_size)));
                    return Ok(block);
                }
                return Err(AllocError::new(new_size, old.align()));
            }
        }
        // SAFETY: forwarded caller contract.
        unsafe { reallocate_by_copy(self, ptr, old, new_size) }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        let Some(block) = ptr else {
            return;
        };
        if let Some(offset) = self.is_last(block, layout.size()) {
            self.cursor.set(offset);
            self.last.set(None);
        }
    }
}

impl Drop for BumpAllocator {
    fn drop(&mut self) {
        if let Ok(layout) = Self::region_layout(self.capacity) {
            // SAFETY: `base` was allocated in `new` with this same layout.
            unsafe { alloc::dealloc(self.base.as_ptr(), layout) };
        }
    }
}

impl fmt::Debug for BumpAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BumpAllocator")
            .field("used", &self.used())
            .field("capacity", &self.capacity)
            .finish()
    }
}
