//! The raw allocator capability.

#![allow(unsafe_code)]

use std::alloc::Layout;
use std::ptr::{self, NonNull};

use trove_core::AllocError;

/// A source of raw memory blocks.
///
/// Methods take `&self` so one allocator can back many containers at
/// once; implementations that keep state use interior mutability. Nothing
/// here is synchronised: sharing an allocator across threads is only
/// possible if the implementation is itself `Sync`.
///
/// # Safety
///
/// Implementors must uphold the contract of each method: blocks returned
/// by [`allocate`](Self::allocate) and [`reallocate`](Self::reallocate)
/// are valid for reads and writes of `layout.size()` bytes, aligned to
/// `layout.align()`, and do not overlap any other live block. Containers
/// rely on this to place elements in the returned memory.
pub unsafe trait RawAllocator {
    /// Allocate a block for `layout`.
    ///
    /// A zero-size layout yields a dangling pointer aligned to
    /// `layout.align()`; it must still be passed back to
    /// [`release`](Self::release), which ignores it.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError>;

    /// Resize a block to `new_size` bytes, keeping `old.align()`.
    ///
    /// Behaves as allocate-new, copy `min(old.size(), new_size)` bytes,
    /// release-old, though implementations may resize in place. `None`
    /// with `old.size() == 0` is a fresh allocation. On failure the old
    /// block is left untouched and still owned by the caller.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None`, or a live block obtained from this allocator
    /// with layout `old`. After success the old pointer must not be used.
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: forwarded caller contract.
        unsafe { reallocate_by_copy(self, ptr, old, new_size) }
    }

    /// Return a block to the allocator. `None` is a no-op.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None`, or a live block obtained from this allocator
    /// with the given `layout`. The block must not be used afterwards.
    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout);
}

/// Reallocate by allocating a new block, copying, and releasing the old one.
///
/// This is the reference semantics of [`RawAllocator::reallocate`];
/// implementations that cannot resize in place fall back to it.
///
/// # Safety
///
/// Same contract as [`RawAllocator::reallocate`].
pub unsafe fn reallocate_by_copy<A: RawAllocator + ?Sized>(
    alloc: &A,
    ptr: Option<NonNull<u8>>,
    old: Layout,
    new_size: usize,
) -> Result<NonNull<u8>, AllocError> {
    let new_layout = Layout::from_size_align(new_size, old.align())
        .map_err(|_| AllocError::new(new_size, old.align()))?;
    let fresh = alloc.allocate(new_layout)?;
    if let Some(old_ptr) = ptr {
        // SAFETY: the caller guarantees `old_ptr` is live for `old.size()`
        // bytes; `fresh` is a distinct live block of `new_size` bytes, so the
        // ranges cannot overlap. The old block is released exactly once.
        unsafe {
            ptr::copy_nonoverlapping(
                old_ptr.as_ptr(),
                fresh.as_ptr(),
                old.size().min(new_size),
            );
            alloc.release(Some(old_ptr), old);
        }
    }
    Ok(fresh)
}

// SAFETY: forwards every call to an allocator that upholds the contract.
unsafe impl<A: RawAllocator + ?Sized> RawAllocator for &A {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        (**self).allocate(layout)
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).reallocate(ptr, old, new_size) }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        // SAFETY: forwarded caller contract.
        unsafe { (**self).release(ptr, layout) }
    }
}

/// A dangling pointer aligned to `align`, used for zero-size blocks.
pub(crate) fn dangling(align: usize) -> NonNull<u8> {
    debug_assert!(align.is_power_of_two());
    // SAFETY: `Layout` alignments are powers of two and therefore non-zero.
    unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(align)) }
}
