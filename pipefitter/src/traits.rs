//! Trait definitions with mockall annotations for testing
//!
//! Every AWS call the reconciler makes goes through one of these traits, so a
//! pass can be driven end to end against mocks. The real implementations live
//! in [`crate::services`].

use async_trait::async_trait;
use shared::{OwnershipTag, PipefitterConfig, Region};

use crate::error::PipefitterResult;
use crate::types::{InstanceFilter, RegisteredTarget, ResourceTags, TargetSpec};

/// Source of the deployment configuration
#[mockall::automock]
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load and validate the configuration
    async fn load(&self) -> PipefitterResult<PipefitterConfig>;
}

/// Instance discovery used to build the desired target host set
#[mockall::automock]
#[async_trait]
pub trait InstanceDiscovery: Send + Sync {
    /// Private IPs of every network interface on instances matching `filter` in `region`
    async fn private_ips(
        &self,
        region: &Region,
        filter: &InstanceFilter,
    ) -> PipefitterResult<Vec<String>>;
}

/// Load balancer target group reads and writes
#[mockall::automock]
#[async_trait]
pub trait TargetGroupApi: Send + Sync {
    /// ARNs of all target groups in `region`
    async fn list_target_groups(&self, region: &Region) -> PipefitterResult<Vec<String>>;

    /// Tags for the given target group ARNs (callers keep batches within the provider limit)
    async fn describe_tags(
        &self,
        region: &Region,
        arns: &[String],
    ) -> PipefitterResult<Vec<ResourceTags>>;

    /// Targets currently registered with a target group
    async fn registered_targets(
        &self,
        region: &Region,
        arn: &str,
    ) -> PipefitterResult<Vec<RegisteredTarget>>;

    /// Register all `targets` in one call
    async fn register_targets(
        &self,
        region: &Region,
        arn: &str,
        targets: &[TargetSpec],
    ) -> PipefitterResult<()>;

    /// Deregister all `targets` in one call
    async fn deregister_targets(
        &self,
        region: &Region,
        arn: &str,
        targets: &[TargetSpec],
    ) -> PipefitterResult<()>;
}

/// VPC endpoint service discovery and permission updates
#[mockall::automock]
#[async_trait]
pub trait EndpointServiceApi: Send + Sync {
    /// Ids of endpoint services in `region` carrying `tag`
    async fn services_by_tag(
        &self,
        region: &Region,
        tag: &OwnershipTag,
    ) -> PipefitterResult<Vec<String>>;

    /// Principals currently allowed to connect to a service
    async fn allowed_principals(
        &self,
        region: &Region,
        service_id: &str,
    ) -> PipefitterResult<Vec<String>>;

    /// Add and remove allowed principals in one call; returns the provider's success flag
    async fn modify_allowed_principals(
        &self,
        region: &Region,
        service_id: &str,
        add: &[String],
        remove: &[String],
    ) -> PipefitterResult<bool>;
}
