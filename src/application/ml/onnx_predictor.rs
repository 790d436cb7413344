use super::predictor::PriceRegressor;
use crate::domain::errors::ArtifactError;
use anyhow::{Result, anyhow};
use ndarray::Array2;
use ort::session::Session;
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

/// Regression graph (e.g. an exported gradient-boosted model) run through ONNX Runtime.
///
/// Expects a single `f32` input of shape `[rows, features]` and reads the first
/// output as one prediction per row.
pub struct OnnxPredictor {
    // Session::run needs exclusive access
    session: Mutex<Session>,
}

impl OnnxPredictor {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        if !path.exists() {
            return Err(ArtifactError::Missing {
                artifact: "model",
                path: path.to_path_buf(),
            });
        }

        let corrupt = |reason: String| ArtifactError::Corrupt {
            artifact: "model",
            path: path.to_path_buf(),
            reason,
        };

        let session = Session::builder()
            .map_err(|e| corrupt(format!("Failed to create ONNX session builder: {}", e)))?
            .commit_from_file(path)
            .map_err(|e| corrupt(format!("Failed to load ONNX model: {}", e)))?;

        info!("Successfully loaded ONNX model from {:?}", path);
        Ok(Self {
            session: Mutex::new(session),
        })
    }
}

impl PriceRegressor for OnnxPredictor {
    fn predict(&self, matrix: &Array2<f64>) -> Result<Vec<f64>> {
        let shape = vec![matrix.nrows(), matrix.ncols()];
        let flat_data: Vec<f32> = matrix.iter().map(|v| *v as f32).collect();

        let input_value = ort::value::Value::from_array((shape.as_slice(), flat_data))
            .map_err(|e| anyhow!("Input value creation failed: {}", e))?;
        let inputs = ort::inputs![input_value];

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow!("Mutex lock failed: {}", e))?;
        let outputs = session.run(inputs).map_err(|e| anyhow!(e.to_string()))?;

        let output_value = outputs
            .iter()
            .next()
            .map(|(_, v)| v)
            .ok_or_else(|| anyhow!("No output found"))?;
        let data = output_value
            .try_extract_tensor::<f32>()
            .map_err(|e| anyhow!(e.to_string()))?;

        Ok(data.1.iter().map(|v| f64::from(*v)).collect())
    }

    fn name(&self) -> &str {
        "ONNX Runtime"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_model() {
        let result = OnnxPredictor::load(Path::new("non_existent.onnx"));
        assert!(matches!(result, Err(ArtifactError::Missing { .. })));
    }
}
