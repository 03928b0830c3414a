//! Main entry point for the pipefitter binary
//!
//! Runs exactly one reconciliation pass with the real AWS services and exits.
//! Scheduling is left to whatever invokes the binary.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use pipefitter::{
    services::{
        AwsClients, Ec2EndpointServiceApi, Ec2InstanceDiscovery, ElbTargetGroupApi,
        RealConfigSource,
    },
    ConfigSource, Pipefitter, PipefitterError,
};
use shared::{deployment_debug, logging, FailurePolicy};

/// Keeps load balancer targets and endpoint service permissions converged
#[derive(Parser)]
#[command(name = "pipefitter")]
#[command(about = "Aligns tagged target groups and endpoint services with live hosts and peers")]
#[command(version)]
pub struct Args {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Env file to read PIPEFITTER_* variables from (defaults to .env discovery)
    #[arg(long)]
    pub env_file: Option<std::path::PathBuf>,

    /// Compute and log changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Abort on the first failing resource instead of continuing
    #[arg(long)]
    pub strict: bool,

    /// Print the pass report as JSON on stdout
    #[arg(long)]
    pub json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    logging::init_tracing_with_level(Some(&args.log_level));

    let config_source = match &args.env_file {
        Some(path) => RealConfigSource::with_env_file(path),
        None => RealConfigSource::new(),
    };
    let mut config = config_source
        .load()
        .await
        .context("Unable to load pipefitter configuration")?;
    if args.strict {
        config.failure_policy = FailurePolicy::Strict;
    }

    // One client set covers every region the pass can touch
    let clients = AwsClients::for_regions(&config.all_regions).await;
    deployment_debug!(
        config.id,
        "AWS clients ready for {} region(s)",
        clients.regions().count()
    );

    let pipefitter = Pipefitter::new(
        Ec2InstanceDiscovery::new(clients.clone()),
        ElbTargetGroupApi::new(clients.clone()),
        Ec2EndpointServiceApi::new(clients),
    )
    .with_dry_run(args.dry_run);

    let report = match pipefitter.run_pass(&config).await {
        Ok(report) => report,
        Err(error) => {
            logging::log_error(&config.id, "Pipefitter pass", &error);
            return Err(error).context("Pipefitter pass aborted");
        }
    };

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Unable to serialize pass report")?
        );
    }

    if report.is_success() {
        logging::log_success(&config.id, &report.status());
        Ok(ExitCode::SUCCESS)
    } else {
        let error = PipefitterError::PassIncomplete {
            failures: report.failures,
        };
        logging::log_error(&config.id, "Pipefitter pass", &error);
        Ok(ExitCode::FAILURE)
    }
}
