//! Data exchanged with the AWS boundary traits

use serde::{Deserialize, Serialize};

/// Availability zone sent with every target description
///
/// Targets are registered by IP and may sit outside the load balancer's VPC,
/// which requires the zone to be `all`.
pub const ALL_ZONES: &str = "all";

/// Instance lifecycle states counted as live target hosts
pub const LIVE_INSTANCE_STATES: &[&str] = &["running", "pending"];

/// Filter applied when searching for target host instances
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceFilter {
    /// EC2 filter name, `tag:<key>`
    pub tag_filter: String,
    pub tag_value: String,
    pub states: Vec<String>,
}

impl InstanceFilter {
    /// Filter for live instances carrying `tag_filter = tag_value`
    pub fn live(tag_filter: impl Into<String>, tag_value: impl Into<String>) -> Self {
        Self {
            tag_filter: tag_filter.into(),
            tag_value: tag_value.into(),
            states: LIVE_INSTANCE_STATES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Tags attached to one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceTags {
    pub resource_id: String,
    pub tags: Vec<(String, String)>,
}

/// A target currently registered with a target group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTarget {
    pub id: String,
    pub port: Option<u16>,
}

impl RegisteredTarget {
    pub fn new(id: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            port: Some(port),
        }
    }
}

/// Target description sent with register and deregister calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub id: String,
    pub port: u16,
    pub availability_zone: String,
}

impl TargetSpec {
    pub fn new(id: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            port,
            availability_zone: ALL_ZONES.to_string(),
        }
    }
}
