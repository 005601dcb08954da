//! Benchmark fixtures for the Trove containers.
//!
//! - [`fill_sequential`]: append `0..n` to a container
//! - [`scatter_indices`]: deterministic pseudo-random positions for
//!   insert/remove workloads
//! - [`BUMP_REGION_BYTES`]: region size that fits every benchmark workload

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use trove_alloc::RawAllocator;
use trove_core::VecError;
use trove_vec::AllocVec;

/// Bump region large enough for a 10K-element `u64` workload including
/// every intermediate growth step.
pub const BUMP_REGION_BYTES: usize = 1 << 20;

/// Append `0..n` to `v`.
pub fn fill_sequential<A: RawAllocator + ?Sized>(
    v: &mut AllocVec<'_, u64, A>,
    n: u64,
) -> Result<(), VecError> {
    for i in 0..n {
        v.push_back(i)?;
    }
    Ok(())
}

/// Generate `count` positions, each valid for a container whose length
/// starts at `len` and changes by `step` per operation (+1 for inserts,
/// -1 for removes).
///
/// Uses the same LCG constants as the PCG family, so a given seed always
/// yields the same sequence.
pub fn scatter_indices(count: usize, len: usize, step: isize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    let mut current = len;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let bound = match step {
            s if s > 0 => current + 1,
            _ => current,
        };
        if bound == 0 {
            break;
        }
        out.push(((state >> 33) as usize) % bound);
        current = current.saturating_add_signed(step);
    }
    out
}
