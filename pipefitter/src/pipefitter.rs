//! Pass driver
//!
//! A pass resolves the desired state once, then walks every managed target
//! group and endpoint service in region order, converging each on that state.
//! All AWS access goes through the injected trait implementations.

use shared::{
    deployment_debug, deployment_info, deployment_warn, logging, FailurePolicy, PipefitterConfig,
    Region, ResourceKind,
};

use crate::{
    core::{PassReport, ResourceOutcome},
    error::{PipefitterError, PipefitterResult},
    reconcile::{
        discover_endpoint_services, discover_target_groups, to_failure, DesiredState, Discovered,
        EndpointPermissionReconciler, TargetGroupReconciler,
    },
    traits::{EndpointServiceApi, InstanceDiscovery, TargetGroupApi},
};

/// Convergence controller for one deployment's target groups and endpoint services
pub struct Pipefitter<I, T, E>
where
    I: InstanceDiscovery + Send + Sync + 'static,
    T: TargetGroupApi + Send + Sync + 'static,
    E: EndpointServiceApi + Send + Sync + 'static,
{
    /// Injected services
    instances: I,
    target_groups: T,
    endpoint_services: E,

    /// Compute and log mutations without issuing writes
    dry_run: bool,
}

impl<I, T, E> Pipefitter<I, T, E>
where
    I: InstanceDiscovery + Send + Sync + 'static,
    T: TargetGroupApi + Send + Sync + 'static,
    E: EndpointServiceApi + Send + Sync + 'static,
{
    /// Create a pipefitter with injected dependencies
    pub fn new(instances: I, target_groups: T, endpoint_services: E) -> Self {
        Self {
            instances,
            target_groups,
            endpoint_services,
            dry_run: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Run one pass and return `"OK"`, or the error that ended it
    ///
    /// Under the isolate policy every recorded failure is returned together as
    /// [`PipefitterError::PassIncomplete`] once all other resources are done.
    pub async fn reconcile(&self, config: &PipefitterConfig) -> PipefitterResult<String> {
        let report = self.run_pass(config).await?;
        if report.is_success() {
            Ok(report.status())
        } else {
            Err(PipefitterError::PassIncomplete {
                failures: report.failures,
            })
        }
    }

    /// Run one pass and return everything it did
    ///
    /// `Err` means the pass was aborted: the desired state could not be
    /// resolved, or the strict policy hit its first failure. Failures isolated
    /// under the default policy are in the report instead.
    pub async fn run_pass(&self, config: &PipefitterConfig) -> PipefitterResult<PassReport> {
        log_pass_start(config);
        if self.dry_run {
            deployment_info!(config.id, "Dry run: no target or permission changes will be written");
        }

        let mut report = PassReport::new(self.dry_run);

        let desired = DesiredState::resolve(&self.instances, config)
            .await
            .inspect_err(|error| logging::log_error(&config.id, "Resolving target hosts", error))?;
        report.desired_hosts = desired.hosts.len();

        if desired.hosts.is_empty() {
            deployment_warn!(config.id, "Did not find any target hosts!");
        } else {
            deployment_info!(
                config.id,
                "Found {} hosts with search {}={} across {}: {:?}",
                desired.hosts.len(),
                config.target_tag,
                config.target_value,
                join_regions(&config.target_regions),
                desired.hosts
            );
        }

        self.reconcile_target_groups(config, &desired, &mut report)
            .await?;
        self.reconcile_endpoint_services(config, &desired, &mut report)
            .await?;

        log_pass_end(config, &report);
        Ok(report)
    }

    async fn reconcile_target_groups(
        &self,
        config: &PipefitterConfig,
        desired: &DesiredState,
        report: &mut PassReport,
    ) -> PipefitterResult<()> {
        let discovered = discover_target_groups(
            &self.target_groups,
            config.target_group_regions(),
            &config.ownership_tag(),
            config.failure_policy,
        )
        .await?;
        absorb_discovery_failures(config, &discovered, report);

        if discovered.is_empty() {
            deployment_info!(config.id, "No ELB target groups to update!");
            return Ok(());
        }
        deployment_debug!(config.id, "Managing {} ELB target group(s)", discovered.len());

        let reconciler = TargetGroupReconciler::new(
            &self.target_groups,
            &config.id,
            config.target_port,
            self.dry_run,
        );
        for (region, arn) in discovered.iter() {
            let result = reconciler.reconcile(region, arn, &desired.hosts).await;
            settle(config, report, ResourceKind::TargetGroup, region, arn, result)?;
        }
        Ok(())
    }

    async fn reconcile_endpoint_services(
        &self,
        config: &PipefitterConfig,
        desired: &DesiredState,
        report: &mut PassReport,
    ) -> PipefitterResult<()> {
        let discovered = discover_endpoint_services(
            &self.endpoint_services,
            &config.pl_regions,
            &config.ownership_tag(),
            config.failure_policy,
        )
        .await?;
        absorb_discovery_failures(config, &discovered, report);

        if discovered.is_empty() {
            deployment_info!(config.id, "No PL Endpoints to update!");
            return Ok(());
        }
        deployment_debug!(config.id, "Managing {} PL endpoint service(s)", discovered.len());

        let reconciler =
            EndpointPermissionReconciler::new(&self.endpoint_services, &config.id, self.dry_run);
        for (region, service_id) in discovered.iter() {
            let result = reconciler
                .reconcile(region, service_id, &desired.accounts)
                .await;
            settle(
                config,
                report,
                ResourceKind::EndpointService,
                region,
                service_id,
                result,
            )?;
        }
        Ok(())
    }
}

/// Record one resource's result, or abort under the strict policy
fn settle(
    config: &PipefitterConfig,
    report: &mut PassReport,
    kind: ResourceKind,
    region: &Region,
    id: &str,
    result: PipefitterResult<ResourceOutcome>,
) -> PipefitterResult<()> {
    match result {
        Ok(outcome) => {
            report.record(outcome);
            Ok(())
        }
        Err(error) => {
            logging::log_error(&config.id, &format!("Reconciling {kind} {region}/{id}"), &error);
            match config.failure_policy {
                FailurePolicy::Strict => Err(error),
                FailurePolicy::Isolate => {
                    report.record_failure(to_failure(kind, region, Some(id), &error));
                    Ok(())
                }
            }
        }
    }
}

fn absorb_discovery_failures(
    config: &PipefitterConfig,
    discovered: &Discovered,
    report: &mut PassReport,
) {
    for failure in &discovered.failures {
        let context = format!("Discovering {} in {}", failure.kind, failure.region);
        logging::log_error(&config.id, &context, &failure.message);
        report.record_failure(failure.clone());
    }
}

fn log_pass_start(config: &PipefitterConfig) {
    logging::log_startup(
        &config.id,
        &format!(
            "Pipefitter {} (id: {}) starting. Targets exist in [{}] on port {} - \
             will search for hosts using {}={}",
            env!("CARGO_PKG_VERSION"),
            config.id,
            join_regions(&config.target_regions),
            config.target_port,
            config.target_tag,
            config.target_value
        ),
    );
    logging::log_progress(
        &config.id,
        "PL enabled",
        &format!(
            "[{}] (satellites: [{}])",
            join_regions(&config.pl_regions),
            join_regions(&config.satellite_regions)
        ),
    );
    logging::log_progress(
        &config.id,
        "Target group regions",
        &format!(
            "[{}] (update all IPs: {}, failure policy: {})",
            join_regions(config.target_group_regions()),
            config.update_all_ips,
            config.failure_policy
        ),
    );
}

fn log_pass_end(config: &PipefitterConfig, report: &PassReport) {
    let summary = format!(
        "{} target group(s), {} endpoint service(s), {} changed, {} failure(s)",
        report.target_groups.len(),
        report.endpoint_services.len(),
        report.changed_count(),
        report.failures.len()
    );
    if report.is_success() {
        logging::log_success(&config.id, &format!("Pass complete: {summary}"));
    } else {
        deployment_warn!(config.id, "Pass incomplete: {}", summary);
    }
}

fn join_regions(regions: &[Region]) -> String {
    regions
        .iter()
        .map(Region::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
