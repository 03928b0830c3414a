//! Reconciliation steps driven by a pass
//!
//! Each step talks to AWS only through the traits in [`crate::traits`]:
//! desired-state resolution, resource discovery, and the two reconcilers.

pub mod desired;
pub mod discovery;
pub mod endpoint_permissions;
pub mod target_groups;

pub use desired::DesiredState;
pub use discovery::{discover_endpoint_services, discover_target_groups, Discovered};
pub use endpoint_permissions::EndpointPermissionReconciler;
pub use target_groups::TargetGroupReconciler;

use shared::{Region, ResourceKind};

use crate::core::{FailureStage, ResourceFailure};
use crate::error::PipefitterError;

/// Stage a reconciliation error belongs to
pub fn failure_stage(error: &PipefitterError) -> FailureStage {
    match error {
        PipefitterError::Mutation { .. } => FailureStage::Write,
        PipefitterError::Read { .. } => FailureStage::Read,
        _ => FailureStage::Discovery,
    }
}

/// Record form of an error raised while handling one resource or region
pub fn to_failure(
    kind: ResourceKind,
    region: &Region,
    resource_id: Option<&str>,
    error: &PipefitterError,
) -> ResourceFailure {
    ResourceFailure {
        kind,
        region: region.clone(),
        resource_id: resource_id.map(str::to_string),
        stage: failure_stage(error),
        message: error.to_string(),
    }
}
