//! Core shared types and identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag key that marks a load balancer target group or endpoint service as managed
pub const OWNERSHIP_TAG_KEY: &str = "pipefitter";

/// AWS region name, e.g. `us-east-1`
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Region(String);

impl Region {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Region {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identifier of this deployment, used as the ownership tag value
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeploymentId(String);

impl DeploymentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Tag key/value pair asserting that a resource belongs to a deployment
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTag {
    pub key: String,
    pub value: String,
}

impl OwnershipTag {
    /// Ownership tag for the given deployment (`pipefitter=<id>`)
    pub fn for_deployment(id: &DeploymentId) -> Self {
        Self {
            key: OWNERSHIP_TAG_KEY.to_string(),
            value: id.as_str().to_string(),
        }
    }

    /// Whether a single key/value pair is this ownership tag
    pub fn matches(&self, key: &str, value: &str) -> bool {
        self.key == key && self.value == value
    }

    /// EC2-style filter name for this tag (`tag:<key>`)
    pub fn filter_name(&self) -> String {
        format!("tag:{}", self.key)
    }
}

impl fmt::Display for OwnershipTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Kind of resource managed by a reconciliation pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    TargetGroup,
    EndpointService,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::TargetGroup => write!(f, "target_group"),
            ResourceKind::EndpointService => write!(f, "endpoint_service"),
        }
    }
}

/// A target group or endpoint service under this deployment's ownership tag
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagedResource {
    pub kind: ResourceKind,
    pub region: Region,
    /// Target group ARN or endpoint service id
    pub id: String,
}

impl ManagedResource {
    pub fn target_group(region: Region, arn: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::TargetGroup,
            region,
            id: arn.into(),
        }
    }

    pub fn endpoint_service(region: Region, service_id: impl Into<String>) -> Self {
        Self {
            kind: ResourceKind::EndpointService,
            region,
            id: service_id.into(),
        }
    }
}

impl fmt::Display for ManagedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.region, self.id)
    }
}
