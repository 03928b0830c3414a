//! Shared logging utilities for consistent tracing across a reconciliation pass

use crate::types::DeploymentId;
use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the filter directive for the given base level
pub fn filter_directive(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("pipefitter={base_level},shared={base_level},aws_config=warn,aws_smithy_runtime=warn")
}

/// Initialize the stdout tracing subscriber
///
/// `RUST_LOG`, when set, takes precedence over the level passed on the command line.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(log_level)));

    // try_init: a second initialization (tests, embedding) is not an error
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for deployment-aware info logging
#[macro_export]
macro_rules! deployment_info {
    ($deployment:expr, $($arg:tt)*) => {
        tracing::info!(
            deployment = %$deployment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for deployment-aware warning logging
#[macro_export]
macro_rules! deployment_warn {
    ($deployment:expr, $($arg:tt)*) => {
        tracing::warn!(
            deployment = %$deployment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for deployment-aware error logging
#[macro_export]
macro_rules! deployment_error {
    ($deployment:expr, $($arg:tt)*) => {
        tracing::error!(
            deployment = %$deployment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for deployment-aware debug logging
#[macro_export]
macro_rules! deployment_debug {
    ($deployment:expr, $($arg:tt)*) => {
        tracing::debug!(
            deployment = %$deployment,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(deployment: &DeploymentId, details: &str) {
    info!(
        deployment = %deployment,
        timestamp = format_timestamp(),
        "START: {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(deployment: &DeploymentId, context: &str, error: &dyn std::fmt::Display) {
    error!(
        deployment = %deployment,
        timestamp = format_timestamp(),
        error = %error,
        "{} failed: {}",
        context,
        error
    );
}

/// Contextual logging helper for success conditions
pub fn log_success(deployment: &DeploymentId, message: &str) {
    info!(
        deployment = %deployment,
        timestamp = format_timestamp(),
        "{}",
        message
    );
}

/// Contextual logging helper for progress updates
pub fn log_progress(deployment: &DeploymentId, action: &str, details: &str) {
    info!(
        deployment = %deployment,
        timestamp = format_timestamp(),
        "{}: {}",
        action,
        details
    );
}
