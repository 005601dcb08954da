//! Core types for the Trove container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the pieces every other Trove crate agrees on: the error taxonomy,
//! container configuration, and the capacity-planning function that
//! decides how storage grows.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod growth;

pub use config::VecConfig;
pub use error::{AllocError, ErrorKind, VecError};
pub use growth::{plan_capacity, required_slots};
