//! Test allocators and fixtures for Trove development.
//!
//! Provides allocator mocks implementing `RawAllocator`:
//!
//! - [`FaultyAllocator`]: fails on demand, for rollback testing.
//! - [`TrackingAllocator`]: records every live block, for leak and
//!   double-free detection.
//!
//! and the drop-order fixtures in [`fixtures`].

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod allocators;
pub mod fixtures;

pub use allocators::{FaultyAllocator, TrackingAllocator};
pub use fixtures::{DropLog, DropProbe};
