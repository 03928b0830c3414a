//! Deployment configuration
//!
//! Configuration is assembled from `PIPEFITTER_*` variables. The loader only
//! needs a key lookup, so the same parsing runs against the process
//! environment in production and against plain maps in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::{SharedError, SharedResult};
use crate::sets::uniq;
use crate::types::{DeploymentId, OwnershipTag, Region};

pub const ENV_ID: &str = "PIPEFITTER_ID";
pub const ENV_PL_ALLOWED_PEERS: &str = "PIPEFITTER_PL_ALLOWED_PEERS";
pub const ENV_PL_REGIONS: &str = "PIPEFITTER_PL_REGIONS";
pub const ENV_TARGET_PORT: &str = "PIPEFITTER_TARGET_PORT";
pub const ENV_TARGET_REGIONS: &str = "PIPEFITTER_TARGET_REGIONS";
pub const ENV_TARGET_TAG: &str = "PIPEFITTER_TARGET_TAG";
pub const ENV_TARGET_VALUE: &str = "PIPEFITTER_TARGET_VALUE";
pub const ENV_UPDATE_ALL_IPS: &str = "PIPEFITTER_UPDATE_ALL_IPS";
pub const ENV_FAILURE_POLICY: &str = "PIPEFITTER_FAILURE_POLICY";

/// Variables that must be present and non-empty, in reporting order
pub const REQUIRED_VARIABLES: &[&str] = &[
    ENV_ID,
    ENV_PL_ALLOWED_PEERS,
    ENV_PL_REGIONS,
    ENV_TARGET_PORT,
    ENV_TARGET_REGIONS,
    ENV_TARGET_TAG,
    ENV_TARGET_VALUE,
];

/// How a pass reacts to a failing resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure, keep reconciling the other resources, report all failures at the end
    #[default]
    Isolate,
    /// Abort the pass on the first failing call
    Strict,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Isolate => write!(f, "isolate"),
            FailurePolicy::Strict => write!(f, "strict"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "isolate" => Ok(FailurePolicy::Isolate),
            "strict" => Ok(FailurePolicy::Strict),
            _ => Err(format!("Unknown failure policy: {s}")),
        }
    }
}

/// Validated configuration for one deployment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipefitterConfig {
    /// Deployment ID, the value of the `pipefitter` ownership tag
    pub id: DeploymentId,
    /// Accounts allowed to connect to the managed endpoint services
    pub allowed_accounts: Vec<String>,
    /// Regions holding managed endpoint services
    pub pl_regions: Vec<Region>,
    pub target_port: u16,
    /// Regions searched for target hosts
    pub target_regions: Vec<Region>,
    /// Instance tag key matched during host discovery
    pub target_tag: String,
    pub target_value: String,
    pub update_all_ips: bool,
    pub failure_policy: FailurePolicy,
    /// Sorted union of endpoint-service and target regions
    pub all_regions: Vec<Region>,
    /// Regions with endpoint services but no target hosts
    pub satellite_regions: Vec<Region>,
}

impl PipefitterConfig {
    /// Build configuration from a variable lookup, reporting every missing variable at once
    pub fn from_lookup<F>(lookup: F) -> SharedResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).unwrap_or_default();

        let missing: Vec<String> = REQUIRED_VARIABLES
            .iter()
            .filter(|&&name| get(name).trim().is_empty())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(SharedError::MissingVariables { names: missing });
        }

        let target_port = parse_port(&get(ENV_TARGET_PORT))?;

        let allowed_accounts = split_list(&get(ENV_PL_ALLOWED_PEERS));
        if let Some(bad) = allowed_accounts.iter().find(|a| !is_account_number(a)) {
            return Err(SharedError::invalid(
                ENV_PL_ALLOWED_PEERS,
                bad,
                "not a 12-digit account number",
            ));
        }

        let pl_regions: Vec<Region> = split_list(&get(ENV_PL_REGIONS))
            .into_iter()
            .map(Region::new)
            .collect();
        let target_regions: Vec<Region> = split_list(&get(ENV_TARGET_REGIONS))
            .into_iter()
            .map(Region::new)
            .collect();

        let update_all_ips = lookup(ENV_UPDATE_ALL_IPS)
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(false);

        let failure_policy = match lookup(ENV_FAILURE_POLICY) {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse::<FailurePolicy>()
                .map_err(|reason: String| SharedError::invalid(ENV_FAILURE_POLICY, &raw, reason))?,
            _ => FailurePolicy::default(),
        };

        let all_regions = uniq(pl_regions.iter().chain(target_regions.iter()).cloned());
        let satellite_regions = all_regions
            .iter()
            .filter(|region| !target_regions.contains(region))
            .cloned()
            .collect();

        Ok(Self {
            id: DeploymentId::new(get(ENV_ID).trim()),
            allowed_accounts,
            pl_regions,
            target_port,
            target_regions,
            target_tag: get(ENV_TARGET_TAG).trim().to_string(),
            target_value: get(ENV_TARGET_VALUE).trim().to_string(),
            update_all_ips,
            failure_policy,
            all_regions,
            satellite_regions,
        })
    }

    /// Ownership tag carried by every resource this deployment manages
    pub fn ownership_tag(&self) -> OwnershipTag {
        OwnershipTag::for_deployment(&self.id)
    }

    /// EC2 filter name for the instance tag (`tag:<key>`)
    pub fn instance_tag_filter(&self) -> String {
        format!("tag:{}", self.target_tag)
    }

    /// Regions whose target groups are updated: every region, or only satellites
    pub fn target_group_regions(&self) -> &[Region] {
        if self.update_all_ips {
            &self.all_regions
        } else {
            &self.satellite_regions
        }
    }
}

/// Split a comma-separated list, trimming items and dropping empty ones
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a port number in [1, 65535]
pub fn parse_port(raw: &str) -> SharedResult<u16> {
    let port: i64 = raw
        .trim()
        .parse()
        .map_err(|_| SharedError::invalid(ENV_TARGET_PORT, raw, "not a number"))?;
    if !(1..=65535).contains(&port) {
        return Err(SharedError::invalid(
            ENV_TARGET_PORT,
            raw,
            "not between 1-65535",
        ));
    }
    Ok(port as u16)
}

/// Boolean spellings accepted for flag variables; anything else is `None`
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// A bare AWS account number: exactly twelve ASCII digits
pub fn is_account_number(value: &str) -> bool {
    value.len() == 12 && value.bytes().all(|b| b.is_ascii_digit())
}
