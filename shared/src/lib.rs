//! Shared types for the pipefitter workspace
//!
//! Holds configuration, identifiers, set helpers and logging setup used by
//! the reconciler crate and its binary.

pub mod config;
pub mod errors;
pub mod logging;
pub mod sets;
pub mod types;

pub use config::{FailurePolicy, PipefitterConfig};
pub use errors::*;
pub use types::*;
