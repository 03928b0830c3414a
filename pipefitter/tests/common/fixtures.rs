//! Test fixtures and data for pipefitter tests

use std::collections::HashMap;

use pipefitter::types::ResourceTags;
use shared::PipefitterConfig;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    /// Deployment and regions
    pub const DEPLOYMENT_ID: &'static str = "prod-a";
    pub const TARGET_REGION: &'static str = "us-east-1";
    pub const SATELLITE_REGION: &'static str = "eu-west-1";
    pub const TARGET_PORT: u16 = 443;

    /// Managed target groups (satellite region)
    pub const TG_A: &'static str =
        "arn:aws:elasticloadbalancing:eu-west-1:123456789012:targetgroup/pf-a/0123456789abcdef";
    pub const TG_B: &'static str =
        "arn:aws:elasticloadbalancing:eu-west-1:123456789012:targetgroup/pf-b/fedcba9876543210";

    /// Managed endpoint service (target region)
    pub const SERVICE_1: &'static str = "vpce-svc-0123456789abcdef0";

    /// Peer accounts
    pub const PEER_ACCOUNT: &'static str = "111111111111";
    pub const STALE_ACCOUNT: &'static str = "222222222222";

    /// Host IPs
    pub const HOST_1: &'static str = "10.0.0.1";
    pub const HOST_2: &'static str = "10.0.0.2";
    pub const STALE_HOST: &'static str = "10.0.0.3";

    /// Baseline environment for one deployment
    pub fn env() -> HashMap<&'static str, String> {
        HashMap::from([
            ("PIPEFITTER_ID", Self::DEPLOYMENT_ID.to_string()),
            ("PIPEFITTER_PL_ALLOWED_PEERS", Self::PEER_ACCOUNT.to_string()),
            (
                "PIPEFITTER_PL_REGIONS",
                format!("{},{}", Self::TARGET_REGION, Self::SATELLITE_REGION),
            ),
            ("PIPEFITTER_TARGET_PORT", Self::TARGET_PORT.to_string()),
            ("PIPEFITTER_TARGET_REGIONS", Self::TARGET_REGION.to_string()),
            ("PIPEFITTER_TARGET_TAG", "role".to_string()),
            ("PIPEFITTER_TARGET_VALUE", "ingest".to_string()),
        ])
    }

    /// Baseline configuration: isolate policy, target groups in the satellite region only
    pub fn config() -> PipefitterConfig {
        Self::config_with(&[])
    }

    /// Baseline configuration with some variables replaced or added
    pub fn config_with(overrides: &[(&'static str, &str)]) -> PipefitterConfig {
        let mut vars = Self::env();
        for (name, value) in overrides {
            vars.insert(*name, value.to_string());
        }
        PipefitterConfig::from_lookup(|name| vars.get(name).cloned())
            .expect("fixture configuration is valid")
    }

    /// Tags marking `arn` as owned by this deployment
    pub fn owned_tags(arn: &str) -> ResourceTags {
        ResourceTags {
            resource_id: arn.to_string(),
            tags: vec![
                ("pipefitter".to_string(), Self::DEPLOYMENT_ID.to_string()),
                ("team".to_string(), "edge".to_string()),
            ],
        }
    }

    /// Root principal ARN for an account
    pub fn root_arn(account: &str) -> String {
        format!("arn:aws:iam::{account}:root")
    }
}
