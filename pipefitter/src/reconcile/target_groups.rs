//! Target group reconciliation
//!
//! Registers desired host IPs missing from a target group and deregisters
//! registered targets that are no longer desired, with at most one register
//! and one deregister call per target group.

use std::collections::BTreeSet;

use shared::{deployment_debug, deployment_info, DeploymentId, ManagedResource, Region};

use crate::core::{Mutation, ResourceOutcome};
use crate::error::PipefitterResult;
use crate::traits::TargetGroupApi;
use crate::types::{RegisteredTarget, TargetSpec};

pub struct TargetGroupReconciler<'a, T: TargetGroupApi + ?Sized> {
    api: &'a T,
    deployment: &'a DeploymentId,
    port: u16,
    dry_run: bool,
}

impl<'a, T: TargetGroupApi + ?Sized> TargetGroupReconciler<'a, T> {
    pub fn new(api: &'a T, deployment: &'a DeploymentId, port: u16, dry_run: bool) -> Self {
        Self {
            api,
            deployment,
            port,
            dry_run,
        }
    }

    /// Converge one target group on `desired_hosts`
    pub async fn reconcile(
        &self,
        region: &Region,
        arn: &str,
        desired_hosts: &[String],
    ) -> PipefitterResult<ResourceOutcome> {
        let registered = self.api.registered_targets(region, arn).await?;
        let observed: Vec<&str> = registered.iter().map(|t| t.id.as_str()).collect();
        let mutation = Mutation::compute(desired_hosts, &observed);
        let resource = ManagedResource::target_group(region.clone(), arn);

        if mutation.is_noop() {
            deployment_debug!(self.deployment, "ELB target group {} up to date", arn);
            return Ok(ResourceOutcome {
                resource,
                mutation,
                applied: false,
            });
        }

        if self.dry_run {
            deployment_info!(self.deployment, "[dry-run] ELB Target Update: {} {}", arn, mutation);
            return Ok(ResourceOutcome {
                resource,
                mutation,
                applied: false,
            });
        }

        if !mutation.additions.is_empty() {
            let targets: Vec<TargetSpec> = mutation
                .additions
                .iter()
                .map(|ip| TargetSpec::new(ip.as_str(), self.port))
                .collect();
            self.api.register_targets(region, arn, &targets).await?;
        }

        if !mutation.removals.is_empty() {
            let targets = deregistration_targets(&registered, &mutation.removals, self.port);
            self.api.deregister_targets(region, arn, &targets).await?;
        }

        deployment_info!(self.deployment, "ELB Target Update: {} {}", arn, mutation);
        Ok(ResourceOutcome {
            resource,
            mutation,
            applied: true,
        })
    }
}

/// Target descriptions for every registration of a removed id
///
/// The load balancer matches deregistrations on id and port, so each removed
/// id is sent with the port it is actually registered on; a registration
/// reported without a port falls back to `default_port`.
pub fn deregistration_targets(
    registered: &[RegisteredTarget],
    removals: &[String],
    default_port: u16,
) -> Vec<TargetSpec> {
    let pairs: BTreeSet<(&str, u16)> = registered
        .iter()
        .filter(|target| removals.contains(&target.id))
        .map(|target| (target.id.as_str(), target.port.unwrap_or(default_port)))
        .collect();

    pairs
        .into_iter()
        .map(|(id, port)| TargetSpec::new(id, port))
        .collect()
}
