//! The growable sequence container.
//!
//! [`AllocVec`] layers element bookkeeping over a `RawBuf`: the first
//! `len` slots hold live values, the rest are raw memory. Every change of
//! the logical range constructs or destroys the affected slot explicitly.
//! Shifting on insert and remove moves the tail with a single block copy;
//! Rust values are always relocatable by bitwise copy, so this is sound for
//! every `T`.

#![allow(unsafe_code)]

use std::fmt;
use std::ptr;
use std::slice;

use trove_alloc::RawAllocator;
use trove_core::{growth, VecConfig, VecError};

use crate::cursor::{Cursor, CursorMut};
use crate::raw::RawBuf;
use crate::slot::UninitSlot;

/// A contiguous growable sequence whose storage comes from a borrowed
/// allocator.
///
/// Storage is allocated lazily: constructing an `AllocVec` never touches
/// the allocator. The first operation that needs a slot allocates
/// `max(initial_capacity, needed)` slots; later growth is 1.5x (see
/// [`trove_core::growth`]).
///
/// All operations that can fail return [`VecError`] and leave the
/// container unchanged on error, including when the allocator runs out
/// of memory mid-growth.
///
/// `AllocVec` is neither `Clone` nor `Send`/`Sync`.
///
/// # Example
///
/// ```
/// use trove_alloc::SystemAllocator;
/// use trove_vec::AllocVec;
///
/// let alloc = SystemAllocator;
/// let mut v = AllocVec::new_in(&alloc);
/// v.push_back(1)?;
/// v.push_back(3)?;
/// v.insert_at(1, 2)?;
/// assert_eq!(v.as_slice(), &[1, 2, 3]);
/// assert_eq!(v.remove_at(0)?, 1);
/// # Ok::<(), trove_core::VecError>(())
/// ```
pub struct AllocVec<'a, T, A: RawAllocator + ?Sized> {
    buf: RawBuf<'a, T, A>,
    /// Number of live elements at the front of `buf`.
    len: usize,
    initial_capacity: usize,
}

impl<'a, T, A: RawAllocator + ?Sized> AllocVec<'a, T, A> {
    /// An empty container with the default initial-capacity hint (1).
    pub fn new_in(alloc: &'a A) -> Self {
        Self {
            buf: RawBuf::new(alloc),
            len: 0,
            initial_capacity: VecConfig::DEFAULT_INITIAL_CAPACITY,
        }
    }

    /// An empty container that will allocate `hint` slots on first use.
    ///
    /// Returns [`VecError::InvalidCapacityHint`] if `hint` is zero.
    pub fn with_hint_in(hint: usize, alloc: &'a A) -> Result<Self, VecError> {
        Self::with_config_in(VecConfig::new(hint), alloc)
    }

    /// An empty container configured by `config`.
    pub fn with_config_in(config: VecConfig, alloc: &'a A) -> Result<Self, VecError> {
        config.validate()?;
        Ok(Self {
            buf: RawBuf::new(alloc),
            len: 0,
            initial_capacity: config.initial_capacity,
        })
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of slots backed by storage.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Whether there are no live elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The initial-capacity hint this container was built with.
    pub fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// The allocator backing this container.
    pub fn allocator(&self) -> &'a A {
        self.buf.allocator()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialised; the pointer is
        // aligned and non-null even when unallocated (len is then 0).
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as for `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.as_ptr(), self.len) }
    }

    /// Iterate over the live elements in index order.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over the live elements in index order.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Append `value`, growing storage if there is no free slot.
    ///
    /// Amortized O(1). On allocation failure the container is unchanged
    /// and `value` is dropped.
    pub fn push_back(&mut self, value: T) -> Result<(), VecError> {
        self.ensure_extra(1)?;
        // SAFETY: `ensure_extra` guarantees slot `len` is within capacity
        // and it is uninitialised.
        unsafe { self.buf.as_ptr().add(self.len).write(value) };
        self.len += 1;
        Ok(())
    }

    /// Reserve the next slot and hand it back unconstructed.
    ///
    /// The element only becomes part of the sequence when
    /// [`UninitSlot::write`] is called. Dropping the slot unwritten leaves
    /// the length unchanged (capacity may have grown).
    pub fn push_uninit(&mut self) -> Result<UninitSlot<'_, T>, VecError> {
        self.ensure_extra(1)?;
        let len = self.len;
        Ok(self.slot_at(len))
    }

    /// Like [`push_uninit`](Self::push_uninit) but the slot lands at
    /// `index` (clamped to `len`) when written, shifting the tail up.
    pub fn insert_uninit(&mut self, index: usize) -> Result<UninitSlot<'_, T>, VecError> {
        let index = index.min(self.len);
        self.ensure_extra(1)?;
        Ok(self.slot_at(index))
    }

    /// Remove and return the last element.
    ///
    /// The slot leaves the container; the returned value is dropped by the
    /// caller. Returns [`VecError::EmptyContainer`] if there is none.
    pub fn pop_back(&mut self) -> Result<T, VecError> {
        if self.len == 0 {
            return Err(VecError::EmptyContainer {
                operation: "pop_back",
            });
        }
        self.len -= 1;
        // SAFETY: slot `len` (old `len - 1`) was live and is now outside
        // the logical range, so it is read exactly once.
        Ok(unsafe { self.buf.as_ptr().add(self.len).read() })
    }

    /// The first element.
    pub fn front(&self) -> Result<&T, VecError> {
        self.as_slice()
            .first()
            .ok_or(VecError::EmptyContainer { operation: "front" })
    }

    /// The first element, mutably.
    pub fn front_mut(&mut self) -> Result<&mut T, VecError> {
        self.as_mut_slice()
            .first_mut()
            .ok_or(VecError::EmptyContainer {
                operation: "front_mut",
            })
    }

    /// The last element.
    pub fn back(&self) -> Result<&T, VecError> {
        self.as_slice()
            .last()
            .ok_or(VecError::EmptyContainer { operation: "back" })
    }

    /// The last element, mutably.
    pub fn back_mut(&mut self) -> Result<&mut T, VecError> {
        self.as_mut_slice()
            .last_mut()
            .ok_or(VecError::EmptyContainer {
                operation: "back_mut",
            })
    }

    /// Bounds-checked access to element `index`.
    pub fn at(&self, index: usize) -> Result<&T, VecError> {
        let len = self.len;
        self.as_slice()
            .get(index)
            .ok_or(VecError::IndexOutOfBounds { index, len })
    }

    /// Bounds-checked mutable access to element `index`.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, VecError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(VecError::IndexOutOfBounds { index, len })
    }

    /// Ensure capacity for at least `max(len, n)` elements.
    ///
    /// Uses the growth policy, so the resulting capacity may exceed `n`.
    /// Does nothing if the capacity already suffices.
    pub fn reserve(&mut self, n: usize) -> Result<(), VecError> {
        if n <= self.len {
            return Ok(());
        }
        self.ensure_extra(n - self.len)
    }

    /// Insert `value` at `index`, shifting `[index, len)` up by one slot.
    ///
    /// `index` is clamped to `len`, so any index past the end appends.
    pub fn insert_at(&mut self, index: usize, value: T) -> Result<(), VecError> {
        self.insert_uninit(index)?.write(value);
        Ok(())
    }

    /// Remove and return the element at `index`, shifting `[index + 1, len)`
    /// down by one slot.
    ///
    /// The returned value is dropped by the caller. Returns
    /// [`VecError::IndexOutOfBounds`] if `index >= len`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, VecError> {
        if index >= self.len {
            return Err(VecError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        let base = self.buf.as_ptr();
        // SAFETY: `index < len`, so the slot is live and is read once. The
        // tail `[index + 1, len)` is live and moved down into
        // `[index, len - 1)`; `ptr::copy` handles the overlap. After the
        // length update the vacated last slot is outside the logical range.
        unsafe {
            let hole = base.add(index);
            let value = hole.read();
            ptr::copy(hole.add(1), hole, self.len - index - 1);
            self.len -= 1;
            Ok(value)
        }
    }

    /// Destroy every element in index order. Capacity is kept.
    pub fn clear(&mut self) {
        let live: *mut [T] = self.as_mut_slice();
        // Shrink the logical range first so a panicking destructor cannot
        // lead to a double drop.
        self.len = 0;
        // SAFETY: `live` covered exactly the initialised prefix, which is no
        // longer reachable through `self`. `drop_in_place` on a slice drops
        // front to back.
        unsafe { ptr::drop_in_place(live) };
    }

    /// Release unused capacity.
    ///
    /// An empty container gives its storage back entirely (capacity 0);
    /// otherwise storage is moved to exactly `len` slots. Never destroys a
    /// live element, and calling it again is a no-op.
    pub fn shrink_to_fit(&mut self) -> Result<(), VecError> {
        if self.len == 0 {
            self.buf.release();
            return Ok(());
        }
        self.buf.resize(self.len)
    }

    /// Clone every item of `items` onto the end.
    ///
    /// Capacity for all of them is reserved up front; if that fails the
    /// container is unchanged.
    pub fn try_extend_from_slice(&mut self, items: &[T]) -> Result<(), VecError>
    where
        T: Clone,
    {
        self.ensure_extra(items.len())?;
        for item in items {
            // SAFETY: capacity for all items was reserved above and each
            // write targets the first free slot.
            unsafe { self.buf.as_ptr().add(self.len).write(item.clone()) };
            self.len += 1;
        }
        Ok(())
    }

    /// Cursor at offset 0.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Past-the-end cursor at offset `len`.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), self.len)
    }

    /// Mutable cursor at offset 0.
    pub fn begin_mut(&mut self) -> CursorMut<'_, 'a, T, A> {
        CursorMut::new(self, 0)
    }

    /// Mutable past-the-end cursor at offset `len`.
    pub fn end_mut(&mut self) -> CursorMut<'_, 'a, T, A> {
        let len = self.len;
        CursorMut::new(self, len)
    }

    /// Make room for `additional` more elements without changing `len`.
    fn ensure_extra(&mut self, additional: usize) -> Result<(), VecError> {
        let required = growth::required_slots(self.len, additional)?;
        if required <= self.buf.capacity() {
            return Ok(());
        }
        let planned = growth::plan_capacity(
            self.buf.capacity(),
            self.buf.is_allocated(),
            required,
            self.initial_capacity,
        );
        self.buf.resize(planned)
    }

    /// Slot handle for a value that will land at `index`.
    ///
    /// Callers must have ensured one free slot and `index <= len`.
    fn slot_at(&mut self, index: usize) -> UninitSlot<'_, T> {
        debug_assert!(index <= self.len && self.len < self.buf.capacity());
        let base = self.buf.as_ptr();
        UninitSlot::new(base, index, &mut self.len)
    }
}

impl<T, A: RawAllocator + ?Sized> Drop for AllocVec<'_, T, A> {
    fn drop(&mut self) {
        self.clear();
        // `buf` releases the storage when it drops.
    }
}

impl<T: fmt::Debug, A: RawAllocator + ?Sized> fmt::Debug for AllocVec<'_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'v, T, A: RawAllocator + ?Sized> IntoIterator for &'v AllocVec<'_, T, A> {
    type Item = &'v T;
    type IntoIter = slice::Iter<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'v, T, A: RawAllocator + ?Sized> IntoIterator for &'v mut AllocVec<'_, T, A> {
    type Item = &'v mut T;
    type IntoIter = slice::IterMut<'v, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trove_alloc::{BumpAllocator, CountingAllocator, SystemAllocator};

    #[test]
    fn construction_does_not_allocate() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let v: AllocVec<'_, u32, _> = AllocVec::with_hint_in(16, &alloc).unwrap();
        assert_eq!(v.capacity(), 0);
        assert_eq!(v.initial_capacity(), 16);
        assert_eq!(alloc.stats().allocations + alloc.stats().reallocations, 0);
    }

    #[test]
    fn first_block_is_counted_as_allocation() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let mut v = AllocVec::new_in(&alloc);
        v.push_back(1u64).unwrap();
        let stats = alloc.stats();
        assert_eq!(stats.allocations, 1);
        assert_eq!(stats.reallocations, 0);
        assert_eq!(stats.live_bytes, 8);

        v.push_back(2).unwrap();
        assert_eq!(alloc.stats().allocations, 1);
        assert_eq!(alloc.stats().reallocations, 1);
    }

    #[test]
    fn zero_hint_rejected() {
        let alloc = SystemAllocator;
        let err = AllocVec::<u8, _>::with_hint_in(0, &alloc).unwrap_err();
        assert_eq!(err, VecError::InvalidCapacityHint { hint: 0 });
    }

    #[test]
    fn first_push_allocates_hint() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::with_hint_in(8, &alloc).unwrap();
        v.push_back(1u8).unwrap();
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn hint_one_scenario() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::with_hint_in(1, &alloc).unwrap();
        for x in 1..=4 {
            v.push_back(x).unwrap();
        }
        assert_eq!(v.len(), 4);
        assert_eq!(v.capacity(), 5);

        assert_eq!(v.remove_at(1).unwrap(), 2);
        assert_eq!(v.as_slice(), &[1, 3, 4]);

        v.insert_at(0, 9).unwrap();
        assert_eq!(v.as_slice(), &[9, 1, 3, 4]);

        v.shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), 4);
        assert_eq!(v.as_slice(), &[9, 1, 3, 4]);
    }

    #[test]
    fn empty_container_preconditions() {
        let alloc = SystemAllocator;
        let mut v: AllocVec<'_, i32, _> = AllocVec::new_in(&alloc);
        assert_eq!(
            v.pop_back().unwrap_err(),
            VecError::EmptyContainer {
                operation: "pop_back"
            }
        );
        assert_eq!(
            v.at(0).unwrap_err(),
            VecError::IndexOutOfBounds { index: 0, len: 0 }
        );
        assert!(v.front().unwrap_err().is_precondition_violation());
        assert!(v.back().unwrap_err().is_precondition_violation());
        assert!(v.front_mut().is_err());
        assert!(v.back_mut().is_err());
        assert!(v.remove_at(0).is_err());
    }

    #[test]
    fn front_back_and_at() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[10, 20, 30]).unwrap();
        assert_eq!(*v.front().unwrap(), 10);
        assert_eq!(*v.back().unwrap(), 30);
        assert_eq!(*v.at(1).unwrap(), 20);
        *v.at_mut(1).unwrap() = 21;
        *v.front_mut().unwrap() += 1;
        *v.back_mut().unwrap() += 1;
        assert_eq!(v.as_slice(), &[11, 21, 31]);
        assert_eq!(
            v.at(3).unwrap_err(),
            VecError::IndexOutOfBounds { index: 3, len: 3 }
        );
    }

    #[test]
    fn pop_then_push_restores_len() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1, 2, 3]).unwrap();
        assert_eq!(v.pop_back().unwrap(), 3);
        v.push_back(7).unwrap();
        assert_eq!(v.len(), 3);
        assert_eq!(*v.back().unwrap(), 7);
    }

    #[test]
    fn insert_index_is_clamped() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.insert_at(100, 'a').unwrap();
        v.insert_at(100, 'b').unwrap();
        v.insert_at(1, 'c').unwrap();
        assert_eq!(v.as_slice(), &['a', 'c', 'b']);
    }

    #[test]
    fn remove_last_and_first() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1, 2, 3, 4]).unwrap();
        assert_eq!(v.remove_at(3).unwrap(), 4);
        assert_eq!(v.remove_at(0).unwrap(), 1);
        assert_eq!(v.as_slice(), &[2, 3]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1u64, 2, 3]).unwrap();
        let cap = v.capacity();
        v.clear();
        assert!(v.is_empty());
        assert_eq!(v.capacity(), cap);

        let before = alloc.stats();
        v.push_back(4).unwrap();
        assert_eq!(alloc.stats(), before);
    }

    #[test]
    fn reserve_grows_without_changing_len() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.push_back(1u32).unwrap();
        v.reserve(10).unwrap();
        assert!(v.capacity() >= 10);
        assert_eq!(v.len(), 1);
    }

    #[test]
    fn reserve_below_len_is_noop() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1u8, 2, 3]).unwrap();
        let before = alloc.stats();
        v.reserve(2).unwrap();
        assert_eq!(alloc.stats(), before);
    }

    #[test]
    fn shrink_to_fit_empty_releases_storage() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1u32, 2, 3]).unwrap();
        v.clear();
        v.shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), 0);
        assert_eq!(alloc.stats().live_bytes, 0);
    }

    #[test]
    fn shrink_to_fit_is_idempotent() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::with_hint_in(32, &alloc).unwrap();
        v.try_extend_from_slice(&[5, 6]).unwrap();
        v.shrink_to_fit().unwrap();
        v.shrink_to_fit().unwrap();
        assert_eq!(v.capacity(), 2);
        assert_eq!(v.as_slice(), &[5, 6]);
    }

    #[test]
    fn regrowth_after_release_uses_hint() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::with_hint_in(6, &alloc).unwrap();
        v.push_back(1).unwrap();
        v.clear();
        v.shrink_to_fit().unwrap();
        v.push_back(2).unwrap();
        assert_eq!(v.capacity(), 6);
    }

    #[test]
    fn push_uninit_writes_in_place() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.push_back(String::from("a")).unwrap();
        let slot = v.push_uninit().unwrap();
        let written = slot.write(String::from("b"));
        written.push('!');
        assert_eq!(v.as_slice(), &["a".to_string(), "b!".to_string()]);
    }

    #[test]
    fn unwritten_slot_leaves_len_unchanged() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.push_back(1).unwrap();
        drop(v.push_uninit().unwrap());
        drop(v.insert_uninit(0).unwrap());
        assert_eq!(v.as_slice(), &[1]);
    }

    #[test]
    fn insert_uninit_shifts_on_write() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1, 3]).unwrap();
        v.insert_uninit(1).unwrap().write(2);
        assert_eq!(v.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn bump_backed_vec_fails_cleanly() {
        let bump = BumpAllocator::new(16).unwrap();
        let mut v = AllocVec::with_hint_in(4, &bump).unwrap();
        for x in 0..4u32 {
            v.push_back(x).unwrap();
        }
        let err = v.push_back(4).unwrap_err();
        assert!(err.is_allocation_failure());
        assert_eq!(v.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(v.capacity(), 4);
    }

    #[test]
    fn zero_sized_elements() {
        let alloc = CountingAllocator::new(SystemAllocator);
        let mut v = AllocVec::new_in(&alloc);
        for _ in 0..100 {
            v.push_back(()).unwrap();
        }
        assert_eq!(v.len(), 100);
        v.remove_at(50).unwrap();
        v.insert_at(0, ()).unwrap();
        assert_eq!(v.len(), 100);
        assert_eq!(alloc.stats(), Default::default());
    }

    #[test]
    fn iteration_and_debug() {
        let alloc = SystemAllocator;
        let mut v = AllocVec::new_in(&alloc);
        v.try_extend_from_slice(&[1, 2, 3]).unwrap();
        for x in &mut v {
            *x *= 10;
        }
        let collected: Vec<i32> = (&v).into_iter().copied().collect();
        assert_eq!(collected, vec![10, 20, 30]);
        assert_eq!(format!("{v:?}"), "[10, 20, 30]");
    }

    #[test]
    fn allocator_accessor_returns_same_reference() {
        let alloc = SystemAllocator;
        let v: AllocVec<'_, u8, _> = AllocVec::new_in(&alloc);
        assert!(std::ptr::eq(v.allocator(), &alloc));
    }

    #[test]
    fn dyn_allocator_is_accepted() {
        let alloc = SystemAllocator;
        let dyn_alloc: &dyn RawAllocator = &alloc;
        let mut v = AllocVec::new_in(dyn_alloc);
        v.push_back(1u16).unwrap();
        assert_eq!(v.len(), 1);
    }
}
