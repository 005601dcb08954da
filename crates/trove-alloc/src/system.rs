//! Allocator backed by the process-wide `std::alloc` allocator.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use trove_core::AllocError;

use crate::allocator::{dangling, RawAllocator};

/// Forwards to [`std::alloc::alloc`], [`std::alloc::realloc`] and
/// [`std::alloc::dealloc`].
///
/// Zero-size requests never reach the global allocator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemAllocator;

// SAFETY: every block comes straight from the global allocator with the
// requested layout, or is a dangling pointer for zero-size layouts.
unsafe impl RawAllocator for SystemAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, AllocError> {
        if layout.size() == 0 {
            return Ok(dangling(layout.align()));
        }
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        NonNull::new(raw).ok_or(AllocError::new(layout.size(), layout.align()))
    }

    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old: Layout,
        new_size: usize,
    ) -> Result<NonNull<u8>, AllocError> {
        let new_layout = Layout::from_size_align(new_size, old.align())
            .map_err(|_| AllocError::new(new_size, old.align()))?;
        match ptr {
            Some(block) if old.size() != 0 => {
                if new_size == 0 {
                    // SAFETY: caller guarantees `block` was allocated with `old`.
                    unsafe { alloc::dealloc(block.as_ptr(), old) };
                    return Ok(dangling(old.align()));
                }
                // SAFETY: `block` was allocated with `old` (caller contract),
                // `new_size` is non-zero and forms a valid layout with
                // `old.align()` as checked above.
                let raw = unsafe { alloc::realloc(block.as_ptr(), old, new_size) };
                NonNull::new(raw).ok_or(AllocError::new(new_size, old.align()))
            }
            // Nothing real to carry over: either no block, or a dangling one.
            _ => self.allocate(new_layout),
        }
    }

    unsafe fn release(&self, ptr: Option<NonNull<u8>>, layout: Layout) {
        if let Some(block) = ptr {
            if layout.size() != 0 {
                // SAFETY: caller guarantees `block` was allocated with `layout`.
                unsafe { alloc::dealloc(block.as_ptr(), layout) };
            }
        }
    }
}
