//! Endpoint service permission reconciliation

use shared::{deployment_info, deployment_warn, DeploymentId, ManagedResource, Region};

use crate::core::{principal_mutation, ResourceOutcome};
use crate::error::PipefitterResult;
use crate::traits::EndpointServiceApi;

pub struct EndpointPermissionReconciler<'a, E: EndpointServiceApi + ?Sized> {
    api: &'a E,
    deployment: &'a DeploymentId,
    dry_run: bool,
}

impl<'a, E: EndpointServiceApi + ?Sized> EndpointPermissionReconciler<'a, E> {
    pub fn new(api: &'a E, deployment: &'a DeploymentId, dry_run: bool) -> Self {
        Self {
            api,
            deployment,
            dry_run,
        }
    }

    /// Converge one endpoint service's allowed principals on `desired_accounts`
    ///
    /// Additions and removals go out together in a single modify call.
    pub async fn reconcile(
        &self,
        region: &Region,
        service_id: &str,
        desired_accounts: &[String],
    ) -> PipefitterResult<ResourceOutcome> {
        let observed = self.api.allowed_principals(region, service_id).await?;
        let mutation = principal_mutation(desired_accounts, &observed);
        let resource = ManagedResource::endpoint_service(region.clone(), service_id);

        if mutation.is_noop() {
            deployment_info!(
                self.deployment,
                "{}/{}: No PL permissions changes",
                region,
                service_id
            );
            return Ok(ResourceOutcome {
                resource,
                mutation,
                applied: false,
            });
        }

        if self.dry_run {
            deployment_info!(
                self.deployment,
                "[dry-run] Would update {}/{}: {}",
                region,
                service_id,
                mutation
            );
            return Ok(ResourceOutcome {
                resource,
                mutation,
                applied: false,
            });
        }

        let accepted = self
            .api
            .modify_allowed_principals(region, service_id, &mutation.additions, &mutation.removals)
            .await?;

        if accepted {
            deployment_info!(self.deployment, "Updated {}/{}: {}", region, service_id, mutation);
        } else {
            deployment_warn!(
                self.deployment,
                "{}/{}: permission update not confirmed by AWS ({})",
                region,
                service_id,
                mutation
            );
        }

        Ok(ResourceOutcome {
            resource,
            mutation,
            applied: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipefitterError;
    use crate::traits::MockEndpointServiceApi;

    fn accounts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_scenario_single_combined_modify() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals()
            .returning(|_, _| Ok(vec!["arn:aws:iam::222222222222:root".to_string()]));
        api.expect_modify_allowed_principals()
            .withf(|_, id, add, remove| {
                id == "vpce-svc-1"
                    && add == ["arn:aws:iam::111111111111:root"]
                    && remove == ["arn:aws:iam::222222222222:root"]
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, false);
        let outcome = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await
            .unwrap();

        assert!(outcome.applied);
        assert_eq!(outcome.resource.id, "vpce-svc-1");
    }

    #[tokio::test]
    async fn test_wildcard_removed_verbatim_with_empty_additions() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals().returning(|_, _| {
            Ok(vec![
                "*".to_string(),
                "arn:aws:iam::111111111111:root".to_string(),
            ])
        });
        api.expect_modify_allowed_principals()
            .withf(|_, _, add, remove| add.is_empty() && remove == ["*"])
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, false);
        let outcome = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await
            .unwrap();

        assert_eq!(outcome.mutation.removals, vec!["*"]);
    }

    #[tokio::test]
    async fn test_matching_permissions_make_no_call() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals()
            .returning(|_, _| Ok(vec!["arn:aws:iam::111111111111:root".to_string()]));
        api.expect_modify_allowed_principals().times(0);

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, false);
        let outcome = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await
            .unwrap();

        assert!(outcome.mutation.is_noop());
        assert!(!outcome.applied);
    }

    #[tokio::test]
    async fn test_unconfirmed_modify_still_counts_as_applied() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals().returning(|_, _| Ok(vec![]));
        api.expect_modify_allowed_principals()
            .times(1)
            .returning(|_, _, _, _| Ok(false));

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, false);
        let outcome = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await
            .unwrap();

        assert!(outcome.applied);
    }

    #[tokio::test]
    async fn test_dry_run_skips_modify() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals().returning(|_, _| Ok(vec![]));
        api.expect_modify_allowed_principals().times(0);

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, true);
        let outcome = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await
            .unwrap();

        assert_eq!(outcome.mutation.additions, vec!["arn:aws:iam::111111111111:root"]);
        assert!(!outcome.applied);
    }

    #[tokio::test]
    async fn test_modify_failure_propagates() {
        let mut api = MockEndpointServiceApi::new();
        api.expect_allowed_principals().returning(|_, _| Ok(vec![]));
        api.expect_modify_allowed_principals()
            .returning(|_, id, _, _| Err(PipefitterError::mutation(id, "InvalidPrincipal")));

        let deployment = DeploymentId::new("prod-a");
        let reconciler = EndpointPermissionReconciler::new(&api, &deployment, false);
        let result = reconciler
            .reconcile(&Region::from("us-east-1"), "vpce-svc-1", &accounts(&["111111111111"]))
            .await;

        assert!(matches!(result, Err(PipefitterError::Mutation { .. })));
    }
}
