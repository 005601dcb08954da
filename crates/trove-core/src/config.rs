//! Container configuration parameters.

use crate::error::VecError;

/// Configuration for a `trove-vec` `AllocVec`.
///
/// Validated at construction; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VecConfig {
    /// Capacity (in elements) requested whenever the container allocates
    /// while holding no storage: the first growth, and the first growth
    /// after `shrink_to_fit()` released everything.
    ///
    /// Default: 1. Must be at least 1. Growth of existing storage ignores it.
    pub initial_capacity: usize,
}

impl VecConfig {
    /// Default initial capacity hint.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 1;

    /// Create a config with the given initial capacity hint.
    pub fn new(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }

    /// Check the config's invariants.
    ///
    /// Returns [`VecError::InvalidCapacityHint`] if `initial_capacity` is zero.
    pub fn validate(&self) -> Result<(), VecError> {
        if self.initial_capacity == 0 {
            return Err(VecError::InvalidCapacityHint {
                hint: self.initial_capacity,
            });
        }
        Ok(())
    }
}

impl Default for VecConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}
