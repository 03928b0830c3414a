//! Pass outcome bookkeeping

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use shared::{ManagedResource, Region, ResourceKind};

use super::mutation::Mutation;

/// Status reported by a pass that finished without failures
pub const STATUS_OK: &str = "OK";

/// Result of reconciling one managed resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceOutcome {
    pub resource: ManagedResource,
    pub mutation: Mutation,
    /// A write call was issued (false for no-ops and dry runs)
    pub applied: bool,
}

impl ResourceOutcome {
    pub fn changed(&self) -> bool {
        !self.mutation.is_noop()
    }
}

/// Step at which a resource failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Discovery,
    Read,
    Write,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Discovery => write!(f, "discovery"),
            FailureStage::Read => write!(f, "read"),
            FailureStage::Write => write!(f, "write"),
        }
    }
}

/// A resource (or a whole region, during discovery) that could not be reconciled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFailure {
    pub kind: ResourceKind,
    pub region: Region,
    /// `None` when discovery failed for the entire region
    pub resource_id: Option<String>,
    pub stage: FailureStage,
    pub message: String,
}

impl fmt::Display for ResourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_id {
            Some(id) => write!(
                f,
                "{} {}/{} ({}): {}",
                self.kind, self.region, id, self.stage, self.message
            ),
            None => write!(
                f,
                "{} {} ({}): {}",
                self.kind, self.region, self.stage, self.message
            ),
        }
    }
}

/// Everything a pass did, in the order it did it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub started_at: DateTime<Utc>,
    pub dry_run: bool,
    /// Number of desired target hosts found
    pub desired_hosts: usize,
    pub target_groups: Vec<ResourceOutcome>,
    pub endpoint_services: Vec<ResourceOutcome>,
    pub failures: Vec<ResourceFailure>,
}

impl PassReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            dry_run,
            desired_hosts: 0,
            target_groups: Vec::new(),
            endpoint_services: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: ResourceOutcome) {
        match outcome.resource.kind {
            ResourceKind::TargetGroup => self.target_groups.push(outcome),
            ResourceKind::EndpointService => self.endpoint_services.push(outcome),
        }
    }

    pub fn record_failure(&mut self, failure: ResourceFailure) {
        self.failures.push(failure);
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of resources whose membership changed (or would have, in a dry run)
    pub fn changed_count(&self) -> usize {
        self.target_groups
            .iter()
            .chain(self.endpoint_services.iter())
            .filter(|outcome| outcome.changed())
            .count()
    }

    /// `"OK"` for a clean pass, otherwise a failure count
    pub fn status(&self) -> String {
        if self.is_success() {
            STATUS_OK.to_string()
        } else {
            format!("FAILED ({} failure(s))", self.failures.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: ResourceKind, mutation: Mutation) -> ResourceOutcome {
        let region = Region::from("us-east-1");
        let resource = match kind {
            ResourceKind::TargetGroup => ManagedResource::target_group(region, "arn:tg"),
            ResourceKind::EndpointService => {
                ManagedResource::endpoint_service(region, "vpce-svc-1")
            }
        };
        ResourceOutcome {
            resource,
            applied: !mutation.is_noop(),
            mutation,
        }
    }

    #[test]
    fn test_record_routes_by_kind() {
        let mut report = PassReport::new(false);
        report.record(outcome(ResourceKind::TargetGroup, Mutation::default()));
        report.record(outcome(
            ResourceKind::EndpointService,
            Mutation::compute(&["a"], &[] as &[&str]),
        ));

        assert_eq!(report.target_groups.len(), 1);
        assert_eq!(report.endpoint_services.len(), 1);
        assert_eq!(report.changed_count(), 1);
        assert_eq!(report.status(), "OK");
    }

    #[test]
    fn test_failures_change_status() {
        let mut report = PassReport::new(false);
        report.record_failure(ResourceFailure {
            kind: ResourceKind::TargetGroup,
            region: Region::from("eu-west-1"),
            resource_id: Some("arn:tg".to_string()),
            stage: FailureStage::Write,
            message: "throttled".to_string(),
        });

        assert!(!report.is_success());
        assert_eq!(report.status(), "FAILED (1 failure(s))");
        assert_eq!(
            report.failures[0].to_string(),
            "target_group eu-west-1/arn:tg (write): throttled"
        );
    }

    #[test]
    fn test_region_failure_display() {
        let failure = ResourceFailure {
            kind: ResourceKind::EndpointService,
            region: Region::from("eu-west-1"),
            resource_id: None,
            stage: FailureStage::Discovery,
            message: "access denied".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "endpoint_service eu-west-1 (discovery): access denied"
        );
    }

    #[test]
    fn test_report_serializes() {
        let report = PassReport::new(true);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["dry_run"], serde_json::Value::Bool(true));
        assert!(json["failures"].as_array().unwrap().is_empty());
    }
}
