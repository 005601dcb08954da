//! Error types for Trove containers and allocators.
//!
//! Errors fall into two classes (see [`ErrorKind`]): precondition
//! violations, where the caller broke a documented contract, and
//! allocation failures, where the allocator could not satisfy a request.
//! Both are detected before the container is mutated, so an `Err` always
//! leaves the container exactly as it was before the call.

use std::error::Error;
use std::fmt;

/// The allocator could not satisfy a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocError {
    /// Number of bytes requested.
    pub size: usize,
    /// Alignment requested, in bytes.
    pub align: usize,
}

impl AllocError {
    /// Build an error for a request of `size` bytes at `align`.
    pub fn new(size: usize, align: usize) -> Self {
        Self { size, align }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "allocation of {} bytes (align {}) failed",
            self.size, self.align
        )
    }
}

impl Error for AllocError {}

/// Broad classification of a [`VecError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller violated a documented precondition (empty pop,
    /// out-of-range index, cursor stepped past its range, zero hint).
    PreconditionViolation,
    /// Storage could not be obtained: the allocator refused, or the
    /// requested capacity cannot be represented.
    AllocationFailure,
}

/// Errors returned by container and cursor operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VecError {
    /// An operation that needs at least one element ran on an empty container.
    EmptyContainer {
        /// Name of the rejected operation (`"pop_back"`, `"front"`, ...).
        operation: &'static str,
    },
    /// An index was outside `0..len`.
    IndexOutOfBounds {
        /// The rejected index.
        index: usize,
        /// Container length at the time of the call.
        len: usize,
    },
    /// A cursor was dereferenced at or past its captured length.
    CursorOutOfRange {
        /// Cursor offset.
        offset: usize,
        /// Length captured when the cursor was created.
        len: usize,
    },
    /// `advance()` on a cursor already at its last valid offset.
    NoNextPosition {
        /// Cursor offset.
        offset: usize,
        /// Length captured when the cursor was created.
        len: usize,
    },
    /// `retreat()` on a cursor at offset zero.
    NoPreviousPosition,
    /// The initial-capacity hint must be at least one.
    InvalidCapacityHint {
        /// The rejected hint.
        hint: usize,
    },
    /// The requested element count overflows `usize` or `isize::MAX` bytes.
    CapacityOverflow {
        /// Number of element slots that were required.
        requested: usize,
    },
    /// The allocator refused the request.
    AllocationFailed(AllocError),
}

impl VecError {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::CapacityOverflow { .. } | Self::AllocationFailed(_) => {
                ErrorKind::AllocationFailure
            }
            _ => ErrorKind::PreconditionViolation,
        }
    }

    /// Shorthand for `kind() == ErrorKind::PreconditionViolation`.
    pub fn is_precondition_violation(&self) -> bool {
        self.kind() == ErrorKind::PreconditionViolation
    }

    /// Shorthand for `kind() == ErrorKind::AllocationFailure`.
    pub fn is_allocation_failure(&self) -> bool {
        self.kind() == ErrorKind::AllocationFailure
    }
}

impl fmt::Display for VecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyContainer { operation } => {
                write!(f, "{operation} called on an empty container")
            }
            Self::IndexOutOfBounds { index, len } => {
                write!(f, "index {index} out of bounds for length {len}")
            }
            Self::CursorOutOfRange { offset, len } => {
                write!(f, "cursor offset {offset} is past the end (length {len})")
            }
            Self::NoNextPosition { offset, len } => {
                write!(f, "cursor at offset {offset} has no next position (length {len})")
            }
            Self::NoPreviousPosition => write!(f, "cursor at offset 0 has no previous position"),
            Self::InvalidCapacityHint { hint } => {
                write!(f, "initial capacity hint must be at least 1, got {hint}")
            }
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements cannot be represented")
            }
            Self::AllocationFailed(err) => write!(f, "out of memory: {err}"),
        }
    }
}

impl Error for VecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::AllocationFailed(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AllocError> for VecError {
    fn from(err: AllocError) -> Self {
        Self::AllocationFailed(err)
    }
}
