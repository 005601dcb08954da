//! Owned backing storage sized in element units.
//!
//! [`RawBuf`] knows nothing about which slots hold live elements; it only
//! owns a block of `capacity` uninitialised `T` slots obtained from a
//! [`RawAllocator`], and moves or releases that block on request. The
//! container layered on top tracks the logical length.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

use trove_alloc::RawAllocator;
use trove_core::VecError;

/// A block of `capacity` uninitialised `T` slots owned through `alloc`.
///
/// Invariant: `ptr.is_none()` exactly when `capacity == 0`. For
/// zero-sized `T` the pointer is dangling and the allocator is never
/// called.
pub(crate) struct RawBuf<'a, T, A: RawAllocator + ?Sized> {
    ptr: Option<NonNull<T>>,
    capacity: usize,
    alloc: &'a A,
    _marker: PhantomData<T>,
}

impl<'a, T, A: RawAllocator + ?Sized> RawBuf<'a, T, A> {
    /// An unallocated buffer. Performs no allocation.
    pub(crate) fn new(alloc: &'a A) -> Self {
        Self {
            ptr: None,
            capacity: 0,
            alloc,
            _marker: PhantomData,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn is_allocated(&self) -> bool {
        self.ptr.is_some()
    }

    pub(crate) fn allocator(&self) -> &'a A {
        self.alloc
    }

    /// Base pointer of the slots. Dangling (but aligned) when unallocated.
    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.unwrap_or(NonNull::dangling()).as_ptr()
    }

    /// Move the block to exactly `new_capacity` slots.
    ///
    /// The first `min(capacity, new_capacity)` slots keep their bytes.
    /// `new_capacity == 0` releases the block. On error nothing changes:
    /// the old block stays owned and the capacity is untouched.
    pub(crate) fn resize(&mut self, new_capacity: usize) -> Result<(), VecError> {
        if new_capacity == self.capacity {
            return Ok(());
        }
        if new_capacity == 0 {
            self.release();
            return Ok(());
        }
        let old_layout = Self::layout_for(self.capacity)?;
        let new_layout = Self::layout_for(new_capacity)?;

        if new_layout.size() == 0 {
            // Zero-sized T: no memory to manage, only bookkeeping.
            self.ptr = Some(NonNull::dangling());
            self.capacity = new_capacity;
            return Ok(());
        }

        let old_block = self.ptr.map(NonNull::cast::<u8>);
        // SAFETY: `old_block` is `None` with `old_layout.size() == 0`, or the
        // live block this buffer obtained from `self.alloc` with `old_layout`.
        let result = unsafe {
            self.alloc
                .reallocate(old_block, old_layout, new_layout.size())
        };
        match result {
            Ok(block) => {
                tracing::trace!(
                    from = self.capacity,
                    to = new_capacity,
                    elem_size = mem::size_of::<T>(),
                    "storage resized"
                );
                self.ptr = Some(block.cast::<T>());
                self.capacity = new_capacity;
                Ok(())
            }
            Err(err) => {
                tracing::debug!(
                    capacity = self.capacity,
                    requested = new_capacity,
                    bytes = err.size,
                    "storage resize failed"
                );
                Err(VecError::AllocationFailed(err))
            }
        }
    }

    /// Give the block back to the allocator and become unallocated.
    pub(crate) fn release(&mut self) {
        let Some(ptr) = self.ptr.take() else {
            return;
        };
        let capacity = mem::replace(&mut self.capacity, 0);
        // The layout was valid when the block was obtained.
        let Ok(layout) = Self::layout_for(capacity) else {
            return;
        };
        if layout.size() != 0 {
            // SAFETY: `ptr` is the live block obtained with `layout`, and it
            // has just been detached from `self`, so it is released once.
            unsafe { self.alloc.release(Some(ptr.cast::<u8>()), layout) };
            tracing::trace!(capacity, "storage released");
        }
    }

    fn layout_for(capacity: usize) -> Result<Layout, VecError> {
        Layout::array::<T>(capacity).map_err(|_| VecError::CapacityOverflow {
            requested: capacity,
        })
    }
}

impl<T, A: RawAllocator + ?Sized> Drop for RawBuf<'_, T, A> {
    fn drop(&mut self) {
        self.release();
    }
}
