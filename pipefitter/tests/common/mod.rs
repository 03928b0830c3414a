//! Common test utilities and infrastructure
//!
//! Shared fixtures and helpers for the pipefitter integration tests.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{PipefitterBuilder, TestHelpers, TestPipefitter};
