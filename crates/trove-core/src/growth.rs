//! Capacity planning for amortized growth.
//!
//! Kept separate from the container so the policy can be tested without
//! touching an allocator. Storage is allocated lazily: nothing is reserved
//! until an operation needs a slot, and the first allocation uses the
//! configured hint. After that capacity grows by half again each time,
//! which bounds the total relocation work of `n` appends to O(n).

use crate::error::VecError;

/// Compute the capacity to grow to so that `required` slots fit.
///
/// - `current`: capacity of the existing storage (in elements).
/// - `allocated`: whether storage is currently held. When it is not, the
///   result is `max(initial_hint, required)`.
/// - `required`: minimum number of slots the caller needs.
/// - `initial_hint`: the container's initial-capacity hint.
///
/// Allocated storage grows to `current + ceil(current / 2)`, raised to
/// `required` if that is still too small. If the geometric step overflows
/// `usize` the plan falls back to exactly `required`. Callers only invoke
/// this when `required > current`.
pub fn plan_capacity(
    current: usize,
    allocated: bool,
    required: usize,
    initial_hint: usize,
) -> usize {
    if !allocated {
        return initial_hint.max(required);
    }
    let step = current.div_ceil(2);
    current.checked_add(step).unwrap_or(required).max(required)
}

/// Number of slots needed to hold `len + additional` elements.
///
/// Returns [`VecError::CapacityOverflow`] if the sum overflows `usize`.
pub fn required_slots(len: usize, additional: usize) -> Result<usize, VecError> {
    len.checked_add(additional).ok_or(VecError::CapacityOverflow {
        requested: usize::MAX,
    })
}
