//! Desired-state resolution
//!
//! Target hosts come from a live instance search across the target regions;
//! allowed accounts come straight from configuration.

use std::collections::BTreeSet;

use shared::{deployment_debug, deployment_warn, PipefitterConfig};

use crate::error::PipefitterResult;
use crate::traits::InstanceDiscovery;
use crate::types::InstanceFilter;

/// Membership every managed resource should converge on during one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    /// Private IPs of live target hosts, in region order
    pub hosts: Vec<String>,
    /// Account numbers allowed on every managed endpoint service
    pub accounts: Vec<String>,
}

impl DesiredState {
    /// Resolve the desired state for `config`
    ///
    /// A failed instance search aborts: an incomplete host list would
    /// deregister healthy targets.
    pub async fn resolve<I>(instances: &I, config: &PipefitterConfig) -> PipefitterResult<Self>
    where
        I: InstanceDiscovery + ?Sized,
    {
        let hosts = resolve_target_hosts(instances, config).await?;
        Ok(Self {
            hosts,
            accounts: config.allowed_accounts.clone(),
        })
    }
}

/// Private IPs of live instances matching the target tag, flattened across regions
///
/// Duplicates are kept (and logged); diffing collapses them.
pub async fn resolve_target_hosts<I>(
    instances: &I,
    config: &PipefitterConfig,
) -> PipefitterResult<Vec<String>>
where
    I: InstanceDiscovery + ?Sized,
{
    let filter = InstanceFilter::live(config.instance_tag_filter(), config.target_value.clone());
    let mut hosts = Vec::new();

    for region in &config.target_regions {
        let ips = instances.private_ips(region, &filter).await?;
        deployment_debug!(config.id, "Found {} host IP(s) in {}", ips.len(), region);
        hosts.extend(ips);
    }

    let duplicates = duplicated(&hosts);
    if !duplicates.is_empty() {
        deployment_warn!(
            config.id,
            "Host IPs reported more than once (multi-interface or misconfigured instances?): {:?}",
            duplicates
        );
    }

    Ok(hosts)
}

fn duplicated(items: &[String]) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut repeated = BTreeSet::new();
    for item in items {
        if !seen.insert(item.as_str()) {
            repeated.insert(item.clone());
        }
    }
    repeated.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipefitterError;
    use crate::traits::MockInstanceDiscovery;
    use shared::Region;
    use std::collections::HashMap;

    fn config(target_regions: &str) -> PipefitterConfig {
        let vars = HashMap::from([
            ("PIPEFITTER_ID", "prod-a".to_string()),
            ("PIPEFITTER_PL_ALLOWED_PEERS", "111111111111".to_string()),
            ("PIPEFITTER_PL_REGIONS", "eu-west-1".to_string()),
            ("PIPEFITTER_TARGET_PORT", "443".to_string()),
            ("PIPEFITTER_TARGET_REGIONS", target_regions.to_string()),
            ("PIPEFITTER_TARGET_TAG", "role".to_string()),
            ("PIPEFITTER_TARGET_VALUE", "ingest".to_string()),
        ]);
        PipefitterConfig::from_lookup(|name| vars.get(name).cloned()).unwrap()
    }

    #[tokio::test]
    async fn test_hosts_flattened_in_region_order() {
        let mut instances = MockInstanceDiscovery::new();
        instances
            .expect_private_ips()
            .withf(|region, filter| {
                region.as_str() == "us-east-1"
                    && filter.tag_filter == "tag:role"
                    && filter.tag_value == "ingest"
                    && filter.states == vec!["running", "pending"]
            })
            .times(1)
            .returning(|_, _| Ok(vec!["10.0.0.1".to_string(), "10.0.0.2".to_string()]));
        instances
            .expect_private_ips()
            .withf(|region, _| region.as_str() == "us-west-2")
            .times(1)
            .returning(|_, _| Ok(vec!["10.1.0.1".to_string()]));

        let desired = DesiredState::resolve(&instances, &config("us-east-1,us-west-2"))
            .await
            .unwrap();

        assert_eq!(desired.hosts, vec!["10.0.0.1", "10.0.0.2", "10.1.0.1"]);
        assert_eq!(desired.accounts, vec!["111111111111"]);
    }

    #[tokio::test]
    async fn test_duplicate_hosts_are_kept() {
        let mut instances = MockInstanceDiscovery::new();
        instances
            .expect_private_ips()
            .returning(|_, _| Ok(vec!["10.0.0.1".to_string(), "10.0.0.1".to_string()]));

        let hosts = resolve_target_hosts(&instances, &config("us-east-1"))
            .await
            .unwrap();

        assert_eq!(hosts, vec!["10.0.0.1", "10.0.0.1"]);
    }

    #[tokio::test]
    async fn test_region_failure_aborts_resolution() {
        let mut instances = MockInstanceDiscovery::new();
        instances
            .expect_private_ips()
            .withf(|region, _| region.as_str() == "us-east-1")
            .returning(|_, _| Ok(vec!["10.0.0.1".to_string()]));
        instances
            .expect_private_ips()
            .withf(|region, _| region.as_str() == "us-west-2")
            .returning(|region, _| {
                Err(PipefitterError::discovery(region, "DescribeInstances", "access denied"))
            });

        let err = resolve_target_hosts(&instances, &config("us-east-1,us-west-2"))
            .await
            .unwrap_err();

        match err {
            PipefitterError::Discovery { region, context, .. } => {
                assert_eq!(region, Region::from("us-west-2"));
                assert_eq!(context, "DescribeInstances");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duplicated_helper() {
        let items: Vec<String> = ["b", "a", "b", "c", "a"].iter().map(|s| s.to_string()).collect();
        assert_eq!(duplicated(&items), vec!["a", "b"]);
    }
}
