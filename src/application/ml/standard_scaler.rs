use super::predictor::FeatureScaler;
use crate::domain::errors::ArtifactError;
use anyhow::{Result, bail};
use ndarray::{Array1, Array2};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

const ARTIFACT: &str = "scaler";

/// Fitted standardization parameters: `(x - mean) / scale`.
/// A missing `mean` disables centering, a missing `scale` disables scaling.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScalerSpec {
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::Missing {
                artifact: ARTIFACT,
                path: path.to_path_buf(),
            });
        }

        let corrupt = |reason: String| ArtifactError::Corrupt {
            artifact: ARTIFACT,
            path: path.to_path_buf(),
            reason,
        };

        let content = fs::read_to_string(path).map_err(|e| corrupt(e.to_string()))?;
        let spec: ScalerSpec =
            serde_json::from_str(&content).map_err(|e| corrupt(e.to_string()))?;
        let scaler = Self::from_spec(spec).map_err(|e| corrupt(e.to_string()))?;

        info!(
            "Loaded standard scaler from {:?} (width: {:?})",
            path,
            scaler.width()
        );
        Ok(scaler)
    }

    pub fn from_spec(spec: ScalerSpec) -> Result<Self> {
        if let (Some(mean), Some(scale)) = (&spec.mean, &spec.scale) {
            if mean.len() != scale.len() {
                bail!(
                    "Scaler mean has {} entries but scale has {}",
                    mean.len(),
                    scale.len()
                );
            }
        }

        // Zero variance features are left unscaled
        let scale = spec.scale.map(|s| {
            s.into_iter()
                .map(|v| if v == 0.0 { 1.0 } else { v })
                .collect::<Array1<f64>>()
        });

        Ok(Self {
            mean: spec.mean.map(Array1::from),
            scale,
        })
    }

    /// Expected number of columns, if the scaler was fitted with parameters
    pub fn width(&self) -> Option<usize> {
        self.mean
            .as_ref()
            .or(self.scale.as_ref())
            .map(|a| a.len())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>> {
        if let Some(width) = self.width() {
            if matrix.ncols() != width {
                bail!(
                    "X has {} features, but the scaler is expecting {} features",
                    matrix.ncols(),
                    width
                );
            }
        }

        let mut scaled = matrix.clone();
        if let Some(mean) = &self.mean {
            scaled -= mean;
        }
        if let Some(scale) = &self.scale {
            scaled /= scale;
        }
        Ok(scaled)
    }

    fn name(&self) -> &str {
        "Standard Scaler"
    }
}
