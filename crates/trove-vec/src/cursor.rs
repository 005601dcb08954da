//! Position cursors over an [`AllocVec`](crate::AllocVec).
//!
//! A cursor captures the container's length when it is created and tracks
//! an offset into it. It borrows the container, so the compiler rejects
//! any structural change (push, insert, remove, growth, shrink) while a
//! cursor is alive; a stale cursor cannot be constructed. The one
//! exception is [`CursorMut::remove_current`], which removes through the
//! cursor and keeps its position consistent with the new length.
//!
//! Ranges are half-open: `end()` sits at offset `len` and exists only as a
//! terminator. Stepping never reaches it: [`Cursor::advance`] requires
//! [`Cursor::has_next`], which is false at the last valid offset.

use std::fmt;

use trove_alloc::RawAllocator;
use trove_core::VecError;

use crate::AllocVec;

/// Read-only cursor. Created by [`AllocVec::begin`](crate::AllocVec::begin)
/// and [`AllocVec::end`](crate::AllocVec::end).
///
/// ```
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// let alloc = SystemAllocator;
/// let mut v = AllocVec::new_in(&alloc);
/// v.try_extend_from_slice(&[1, 2, 3])?;
///
/// let mut seen = Vec::new();
/// let mut cursor = v.begin();
/// while cursor.is_valid() {
///     seen.push(*cursor.current()?);
///     if !cursor.has_next() {
///         break;
///     }
///     cursor.advance()?;
/// }
/// assert_eq!(seen, [1, 2, 3]);
/// # Ok::<(), trove_core::VecError>(())
/// ```
///
/// A live cursor keeps the container borrowed, so growth, insertion,
/// removal, shrinking and clearing are rejected until it is dropped:
///
/// ```compile_fail,E0502
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin();
/// let _ = v.push_back(4);
/// let _ = cursor.current();
/// ```
///
/// ```compile_fail,E0502
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin();
/// let _ = v.insert_at(0, 0);
/// let _ = cursor.current();
/// ```
///
/// ```compile_fail,E0502
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin();
/// let _ = v.remove_at(0);
/// let _ = cursor.current();
/// ```
///
/// ```compile_fail,E0502
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin();
/// let _ = v.shrink_to_fit();
/// let _ = cursor.current();
/// ```
///
/// ```compile_fail,E0502
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin();
/// v.clear();
/// let _ = cursor.current();
/// ```
pub struct Cursor<'v, T> {
    elems: &'v [T],
    offset: usize,
}

impl<'v, T> Cursor<'v, T> {
    pub(crate) fn new(elems: &'v [T], offset: usize) -> Self {
        Self { elems, offset }
    }

    /// Current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the container when the cursor was created.
    pub fn captured_len(&self) -> usize {
        self.elems.len()
    }

    /// Whether `offset + 1` is still a valid position.
    pub fn has_next(&self) -> bool {
        self.offset + 1 < self.elems.len()
    }

    /// Step forward one position.
    ///
    /// Returns [`VecError::NoNextPosition`] if [`has_next`](Self::has_next)
    /// is false.
    pub fn advance(&mut self) -> Result<(), VecError> {
        if !self.has_next() {
            return Err(VecError::NoNextPosition {
                offset: self.offset,
                len: self.elems.len(),
            });
        }
        self.offset += 1;
        Ok(())
    }

    /// Whether there is a position before this one.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Step back one position.
    pub fn retreat(&mut self) -> Result<(), VecError> {
        if !self.has_previous() {
            return Err(VecError::NoPreviousPosition);
        }
        self.offset -= 1;
        Ok(())
    }

    /// The element at the current offset.
    ///
    /// Returns [`VecError::CursorOutOfRange`] on a past-the-end cursor.
    pub fn current(&self) -> Result<&'v T, VecError> {
        self.elems.get(self.offset).ok_or(VecError::CursorOutOfRange {
            offset: self.offset,
            len: self.elems.len(),
        })
    }

    /// Whether the cursor points at a live element.
    pub fn is_valid(&self) -> bool {
        self.offset < self.elems.len()
    }
}

// Manual impls: deriving would require `T: Clone`/`T: Debug`.
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("offset", &self.offset)
            .field("captured_len", &self.elems.len())
            .finish()
    }
}

/// Mutable cursor. Created by
/// [`AllocVec::begin_mut`](crate::AllocVec::begin_mut) and
/// [`AllocVec::end_mut`](crate::AllocVec::end_mut).
///
/// Same stepping rules as [`Cursor`]; additionally hands out `&mut T` to
/// the current element and can remove it with
/// [`remove_current`](Self::remove_current). It holds the container
/// exclusively, so the container cannot be touched except through the
/// cursor until the cursor is dropped:
///
/// ```compile_fail,E0499
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin_mut();
/// let _ = v.push_back(2);
/// let _ = cursor.offset();
/// ```
///
/// ```compile_fail,E0499
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin_mut();
/// let _ = v.insert_at(0, 0);
/// let _ = cursor.offset();
/// ```
///
/// ```compile_fail,E0499
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin_mut();
/// let _ = v.remove_at(0);
/// let _ = cursor.offset();
/// ```
///
/// ```compile_fail,E0499
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin_mut();
/// let _ = v.shrink_to_fit();
/// let _ = cursor.offset();
/// ```
///
/// ```compile_fail,E0499
/// # use trove_alloc::SystemAllocator;
/// # use trove_vec::AllocVec;
/// # let alloc = SystemAllocator;
/// # let mut v = AllocVec::new_in(&alloc);
/// # v.push_back(1).unwrap();
/// let cursor = v.begin_mut();
/// v.clear();
/// let _ = cursor.offset();
/// ```
pub struct CursorMut<'v, 'a, T, A: RawAllocator + ?Sized> {
    vec: &'v mut AllocVec<'a, T, A>,
    offset: usize,
}

impl<'v, 'a, T, A: RawAllocator + ?Sized> CursorMut<'v, 'a, T, A> {
    pub(crate) fn new(vec: &'v mut AllocVec<'a, T, A>, offset: usize) -> Self {
        Self { vec, offset }
    }

    /// Current offset.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Length of the container. Only changes through
    /// [`remove_current`](Self::remove_current).
    pub fn captured_len(&self) -> usize {
        self.vec.len()
    }

    /// Whether `offset + 1` is still a valid position.
    pub fn has_next(&self) -> bool {
        self.offset + 1 < self.vec.len()
    }

    /// Step forward one position.
    pub fn advance(&mut self) -> Result<(), VecError> {
        if !self.has_next() {
            return Err(VecError::NoNextPosition {
                offset: self.offset,
                len: self.vec.len(),
            });
        }
        self.offset += 1;
        Ok(())
    }

    /// Whether there is a position before this one.
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// Step back one position.
    pub fn retreat(&mut self) -> Result<(), VecError> {
        if !self.has_previous() {
            return Err(VecError::NoPreviousPosition);
        }
        self.offset -= 1;
        Ok(())
    }

    /// The element at the current offset.
    pub fn current(&self) -> Result<&T, VecError> {
        self.vec
            .as_slice()
            .get(self.offset)
            .ok_or(VecError::CursorOutOfRange {
                offset: self.offset,
                len: self.vec.len(),
            })
    }

    /// The element at the current offset, mutably.
    pub fn current_mut(&mut self) -> Result<&mut T, VecError> {
        let len = self.vec.len();
        let offset = self.offset;
        self.vec
            .as_mut_slice()
            .get_mut(offset)
            .ok_or(VecError::CursorOutOfRange { offset, len })
    }

    /// Remove the element at the current offset and return it.
    ///
    /// The offset is kept, so the cursor then points at the element that
    /// followed the removed one, or past the end if the last element was
    /// removed. Returns [`VecError::CursorOutOfRange`] on a past-the-end
    /// cursor.
    pub fn remove_current(&mut self) -> Result<T, VecError> {
        if !self.is_valid() {
            return Err(VecError::CursorOutOfRange {
                offset: self.offset,
                len: self.vec.len(),
            });
        }
        self.vec.remove_at(self.offset)
    }

    /// Whether the cursor points at a live element.
    pub fn is_valid(&self) -> bool {
        self.offset < self.vec.len()
    }
}

impl<T, A: RawAllocator + ?Sized> PartialEq for CursorMut<'_, '_, T, A> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}

impl<T, A: RawAllocator + ?Sized> fmt::Debug for CursorMut<'_, '_, T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("offset", &self.offset)
            .field("captured_len", &self.vec.len())
            .finish()
    }
}
