//! Test helpers and builder patterns for pipefitter tests

use pipefitter::traits::{MockEndpointServiceApi, MockInstanceDiscovery, MockTargetGroupApi};
use pipefitter::types::RegisteredTarget;
use pipefitter::Pipefitter;

use super::fixtures::TestFixtures;

pub type TestPipefitter =
    Pipefitter<MockInstanceDiscovery, MockTargetGroupApi, MockEndpointServiceApi>;

/// Builder for a pipefitter over mocks
///
/// Mocks start with no expectations; any call a test did not set up panics.
pub struct PipefitterBuilder {
    instances: MockInstanceDiscovery,
    target_groups: MockTargetGroupApi,
    endpoint_services: MockEndpointServiceApi,
    dry_run: bool,
}

impl PipefitterBuilder {
    pub fn new() -> Self {
        Self {
            instances: MockInstanceDiscovery::new(),
            target_groups: MockTargetGroupApi::new(),
            endpoint_services: MockEndpointServiceApi::new(),
            dry_run: false,
        }
    }

    /// Configure the instance discovery mock with a setup function
    pub fn with_instances<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockInstanceDiscovery),
    {
        setup(&mut self.instances);
        self
    }

    /// Configure the target group mock with a setup function
    pub fn with_target_groups<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockTargetGroupApi),
    {
        setup(&mut self.target_groups);
        self
    }

    /// Configure the endpoint service mock with a setup function
    pub fn with_endpoint_services<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut MockEndpointServiceApi),
    {
        setup(&mut self.endpoint_services);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn build(self) -> TestPipefitter {
        Pipefitter::new(self.instances, self.target_groups, self.endpoint_services)
            .with_dry_run(self.dry_run)
    }
}

impl Default for PipefitterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Expectation shortcuts shared by the integration tests
pub struct TestHelpers;

impl TestHelpers {
    pub fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Host search in `region` returns `ips`
    pub fn expect_hosts(mock: &mut MockInstanceDiscovery, region: &'static str, ips: &[&str]) {
        let ips = Self::strings(ips);
        mock.expect_private_ips()
            .withf(move |r, _| r.as_str() == region)
            .times(1)
            .returning(move |_, _| Ok(ips.clone()));
    }

    /// `region` lists `arns`, all tagged as owned
    pub fn expect_owned_target_groups(
        mock: &mut MockTargetGroupApi,
        region: &'static str,
        arns: &[&str],
    ) {
        let listed = Self::strings(arns);
        mock.expect_list_target_groups()
            .withf(move |r| r.as_str() == region)
            .times(1)
            .returning(move |_| Ok(listed.clone()));
        mock.expect_describe_tags()
            .withf(move |r, _| r.as_str() == region)
            .returning(|_, arns| {
                Ok(arns.iter().map(|arn| TestFixtures::owned_tags(arn)).collect())
            });
    }

    /// `arn` currently has `ips` registered on the fixture port
    pub fn expect_registered(mock: &mut MockTargetGroupApi, arn: &'static str, ips: &[&str]) {
        let registered: Vec<RegisteredTarget> = ips
            .iter()
            .map(|ip| RegisteredTarget::new(*ip, TestFixtures::TARGET_PORT))
            .collect();
        mock.expect_registered_targets()
            .withf(move |_, a| a == arn)
            .times(1)
            .returning(move |_, _| Ok(registered.clone()));
    }

    /// Endpoint service search in `region` returns `ids`
    pub fn expect_services(mock: &mut MockEndpointServiceApi, region: &'static str, ids: &[&str]) {
        let ids = Self::strings(ids);
        mock.expect_services_by_tag()
            .withf(move |r, tag| r.as_str() == region && tag.value == TestFixtures::DEPLOYMENT_ID)
            .times(1)
            .returning(move |_, _| Ok(ids.clone()));
    }

    /// `service_id` currently allows `principals`
    pub fn expect_principals(
        mock: &mut MockEndpointServiceApi,
        service_id: &'static str,
        principals: Vec<String>,
    ) {
        mock.expect_allowed_principals()
            .withf(move |_, id| id == service_id)
            .times(1)
            .returning(move |_, _| Ok(principals.clone()));
    }
}
