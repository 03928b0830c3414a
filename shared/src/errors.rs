//! Shared error types for configuration and common plumbing

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SharedError {
    #[error("Missing configuration environment vars: {}", names.join(", "))]
    MissingVariables { names: Vec<String> },

    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },
}

impl SharedError {
    pub fn invalid(field: &str, value: &str, reason: impl Into<String>) -> Self {
        SharedError::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
