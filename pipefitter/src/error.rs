//! Reconciler error types

use shared::{Region, SharedError};
use thiserror::Error;

use crate::core::report::ResourceFailure;

#[derive(Error, Debug)]
pub enum PipefitterError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("{context} failed in {region}: {message}")]
    Discovery {
        region: Region,
        context: String,
        message: String,
    },

    #[error("Reading {resource} failed: {message}")]
    Read { resource: String, message: String },

    #[error("Updating {resource} failed: {message}")]
    Mutation { resource: String, message: String },

    #[error("Pass incomplete: {} resource(s) failed: {}", failures.len(), summarize(failures))]
    PassIncomplete { failures: Vec<ResourceFailure> },

    #[error(transparent)]
    Shared(#[from] SharedError),
}

impl PipefitterError {
    pub fn configuration(message: impl Into<String>) -> Self {
        PipefitterError::Configuration {
            message: message.into(),
        }
    }

    pub fn discovery(region: &Region, context: &str, message: impl Into<String>) -> Self {
        PipefitterError::Discovery {
            region: region.clone(),
            context: context.to_string(),
            message: message.into(),
        }
    }

    pub fn read(resource: impl Into<String>, message: impl Into<String>) -> Self {
        PipefitterError::Read {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn mutation(resource: impl Into<String>, message: impl Into<String>) -> Self {
        PipefitterError::Mutation {
            resource: resource.into(),
            message: message.into(),
        }
    }
}

fn summarize(failures: &[ResourceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type PipefitterResult<T> = Result<T, PipefitterError>;
