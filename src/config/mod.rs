//! Configuration module for Housecast.
//!
//! Configuration is loaded from environment variables (a `.env` file is honoured
//! by the binaries). Artifact locations live in [`ArtifactEnvConfig`].

mod artifact_config;

pub use artifact_config::{ArtifactEnvConfig, ModelBackend};

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct PredictorConfig {
    pub artifacts: ArtifactEnvConfig,
}

impl PredictorConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let artifacts = ArtifactEnvConfig::from_env().context("Failed to load artifact config")?;
        Ok(Self { artifacts })
    }

    /// Overrides the directory artifacts are read from.
    pub fn with_models_dir(mut self, models_dir: impl Into<PathBuf>) -> Self {
        self.artifacts.models_dir = models_dir.into();
        self
    }
}
