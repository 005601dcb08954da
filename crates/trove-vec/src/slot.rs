//! Deferred construction of a single element.

#![allow(unsafe_code)]

use std::marker::PhantomData;
use std::ptr;

/// A reserved but unconstructed slot in an [`AllocVec`](crate::AllocVec).
///
/// Returned by [`push_uninit`](crate::AllocVec::push_uninit) and
/// [`insert_uninit`](crate::AllocVec::insert_uninit). Capacity for the
/// element is already secured, so [`write`](Self::write) cannot fail.
/// The element is constructed exactly once, when `write` runs; dropping
/// the slot instead leaves the container's contents as they were.
#[must_use = "the element is only added when the slot is written"]
pub struct UninitSlot<'v, T> {
    /// Base of the container's storage.
    base: *mut T,
    /// Position the element will occupy.
    index: usize,
    /// The container's length, bumped on write.
    len: &'v mut usize,
    _marker: PhantomData<&'v mut T>,
}

impl<'v, T> UninitSlot<'v, T> {
    /// Caller guarantees `index <= *len < capacity` of the storage at `base`.
    pub(crate) fn new(base: *mut T, index: usize, len: &'v mut usize) -> Self {
        Self {
            base,
            index,
            len,
            _marker: PhantomData,
        }
    }

    /// Position the element will occupy once written.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Construct `value` in the slot and return a reference to it.
    ///
    /// Elements at and after [`index`](Self::index) move up one position.
    pub fn write(self, value: T) -> &'v mut T {
        let len = *self.len;
        // SAFETY: `new`'s contract puts slot `len` within capacity and
        // uninitialised, so shifting `[index, len)` up by one stays in
        // bounds (`ptr::copy` allows the overlap). The vacated slot `index`
        // is then initialised with `value` before the length grows.
        unsafe {
            let hole = self.base.add(self.index);
            ptr::copy(hole, hole.add(1), len - self.index);
            hole.write(value);
            *self.len = len + 1;
            &mut *hole
        }
    }
}
