//! Artifact location parsing from environment variables.

use anyhow::Result;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Which model runtime reads the model artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelBackend {
    Onnx,
    SmartCore,
}

impl ModelBackend {
    pub fn default_model_file(&self) -> &'static str {
        match self {
            ModelBackend::Onnx => "real_estate_model.onnx",
            ModelBackend::SmartCore => "real_estate_model.json",
        }
    }
}

impl fmt::Display for ModelBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelBackend::Onnx => f.write_str("onnx"),
            ModelBackend::SmartCore => f.write_str("smartcore"),
        }
    }
}

impl FromStr for ModelBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "onnx" => Ok(ModelBackend::Onnx),
            "smartcore" => Ok(ModelBackend::SmartCore),
            _ => anyhow::bail!(
                "Invalid MODEL_BACKEND: {}. Must be 'onnx' or 'smartcore'",
                s
            ),
        }
    }
}

/// Artifact environment configuration
#[derive(Debug, Clone)]
pub struct ArtifactEnvConfig {
    pub models_dir: PathBuf,
    pub backend: ModelBackend,
    pub model_file: String,
    pub preprocessor_file: String,
    pub scaler_file: String,
    pub indicators_file: String,
}

impl Default for ArtifactEnvConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            backend: ModelBackend::Onnx,
            model_file: ModelBackend::Onnx.default_model_file().to_string(),
            preprocessor_file: "preprocessor.json".to_string(),
            scaler_file: "scaler.json".to_string(),
            indicators_file: "economic_indicators.json".to_string(),
        }
    }
}

impl ArtifactEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let backend = match env::var("MODEL_BACKEND") {
            Ok(value) => ModelBackend::from_str(&value)?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            models_dir: env::var("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.models_dir),
            backend,
            model_file: env::var("MODEL_FILE")
                .unwrap_or_else(|_| backend.default_model_file().to_string()),
            preprocessor_file: env::var("PREPROCESSOR_FILE")
                .unwrap_or(defaults.preprocessor_file),
            scaler_file: env::var("SCALER_FILE").unwrap_or(defaults.scaler_file),
            indicators_file: env::var("INDICATORS_FILE").unwrap_or(defaults.indicators_file),
        })
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model_file)
    }

    pub fn preprocessor_path(&self) -> PathBuf {
        self.resolve(&self.preprocessor_file)
    }

    pub fn scaler_path(&self) -> PathBuf {
        self.resolve(&self.scaler_file)
    }

    pub fn indicators_path(&self) -> PathBuf {
        self.resolve(&self.indicators_file)
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = Path::new(file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.models_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parsing() {
        assert_eq!("onnx".parse::<ModelBackend>().unwrap(), ModelBackend::Onnx);
        assert_eq!(
            "SmartCore".parse::<ModelBackend>().unwrap(),
            ModelBackend::SmartCore
        );
        assert!("xgboost".parse::<ModelBackend>().is_err());
    }

    #[test]
    fn test_paths_resolve_under_models_dir() {
        let config = ArtifactEnvConfig {
            models_dir: PathBuf::from("/srv/models"),
            ..Default::default()
        };
        assert_eq!(
            config.model_path(),
            PathBuf::from("/srv/models/real_estate_model.onnx")
        );
        assert_eq!(
            config.indicators_path(),
            PathBuf::from("/srv/models/economic_indicators.json")
        );
    }

    #[test]
    fn test_absolute_file_overrides_models_dir() {
        let config = ArtifactEnvConfig {
            scaler_file: "/etc/housecast/scaler.json".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.scaler_path(),
            PathBuf::from("/etc/housecast/scaler.json")
        );
    }
}
