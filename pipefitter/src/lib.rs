//! Pipefitter library for keeping AWS membership sets converged
//!
//! One pass reads the live target hosts and the configured peer accounts,
//! then aligns every load balancer target group and VPC endpoint service
//! tagged `pipefitter=<deployment id>` with them. Every AWS call goes through
//! the traits in [`traits`], so a pass can run against mocks.

pub mod core;
pub mod error;
pub mod pipefitter;
pub mod reconcile;
pub mod services;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use core::{Mutation, PassReport, ResourceFailure, ResourceOutcome};
pub use error::{PipefitterError, PipefitterResult};
pub use pipefitter::Pipefitter;
pub use traits::{ConfigSource, EndpointServiceApi, InstanceDiscovery, TargetGroupApi};
