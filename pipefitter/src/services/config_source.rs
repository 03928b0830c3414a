//! Configuration loaded from the environment
//!
//! ## Sources
//! 1. An explicit env file (`--env-file`), or a `.env` file found in the
//!    current directory or one of its parents
//! 2. Process environment variables
//!
//! Process environment variables take precedence over file values.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use shared::PipefitterConfig;

use crate::error::{PipefitterError, PipefitterResult};
use crate::traits::ConfigSource;

/// Config source reading `PIPEFITTER_*` variables
#[derive(Debug, Clone, Default)]
pub struct RealConfigSource {
    env_file: Option<PathBuf>,
}

impl RealConfigSource {
    /// Process environment plus any discovered `.env` file
    pub fn new() -> Self {
        Self::default()
    }

    /// Process environment layered over a specific env file
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_file: Some(path.into()),
        }
    }

    fn read_env_file(&self) -> PipefitterResult<HashMap<String, String>> {
        let Some(path) = &self.env_file else {
            // A missing .env is fine; the environment may carry everything
            let _ = dotenv::dotenv();
            return Ok(HashMap::new());
        };

        let entries = dotenv::from_path_iter(path).map_err(|e| {
            PipefitterError::configuration(format!("Cannot read {}: {e}", path.display()))
        })?;
        entries
            .map(|entry| {
                entry.map_err(|e| {
                    PipefitterError::configuration(format!("Cannot parse {}: {e}", path.display()))
                })
            })
            .collect()
    }
}

#[async_trait]
impl ConfigSource for RealConfigSource {
    async fn load(&self) -> PipefitterResult<PipefitterConfig> {
        let file_values = self.read_env_file()?;
        let config = PipefitterConfig::from_lookup(|name| {
            std::env::var(name)
                .ok()
                .or_else(|| file_values.get(name).cloned())
        })?;
        Ok(config)
    }
}
