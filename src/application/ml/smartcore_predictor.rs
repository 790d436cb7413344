use super::predictor::PriceRegressor;
use crate::domain::errors::ArtifactError;
use anyhow::{Result, anyhow};
use ndarray::Array2;
use smartcore::ensemble::random_forest_regressor::RandomForestRegressor;
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

pub type ForestModel = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// Random forest regressor persisted with serde_json.
pub struct SmartCorePredictor {
    model: ForestModel,
}

impl SmartCorePredictor {
    pub fn new(model: ForestModel) -> Self {
        Self { model }
    }

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

        let file = File::open(path).map_err(|e| corrupt(e.to_string()))?;
        let model: ForestModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| corrupt(format!("Failed to deserialize ML model: {}", e)))?;

        info!("Successfully loaded ML model from {:?}", path);
        Ok(Self { model })
    }
}

impl PriceRegressor for SmartCorePredictor {
    fn predict(&self, matrix: &Array2<f64>) -> Result<Vec<f64>> {
        let rows: Vec<Vec<f64>> = matrix.rows().into_iter().map(|r| r.to_vec()).collect();
        let input = DenseMatrix::from_2d_vec(&rows)
            .map_err(|e| anyhow!("Matrix creation failed: {}", e))?;

        self.model
            .predict(&input)
            .map_err(|e| anyhow!("Prediction failed: {}", e))
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }

    fn version(&self) -> &str {
        "v1.0"
    }
}
