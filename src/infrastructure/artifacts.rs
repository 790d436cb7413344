//! Loads every artifact the prediction pipeline needs, once, at process start.

use crate::application::ml::column_encoder::ColumnEncoder;
use crate::application::ml::onnx_predictor::OnnxPredictor;
use crate::application::ml::smartcore_predictor::SmartCorePredictor;
use crate::application::ml::standard_scaler::StandardScaler;
use crate::application::ml::{FeatureEncoder, FeatureScaler, PriceRegressor};
use crate::application::prediction_service::PredictionService;
use crate::config::{ArtifactEnvConfig, ModelBackend};
use crate::domain::errors::ArtifactError;
use crate::domain::indicators::IndicatorStore;
use crate::infrastructure::indicator_persistence::IndicatorPersistence;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Read-only handles shared by every prediction.
pub struct ModelArtifacts {
    pub encoder: Arc<dyn FeatureEncoder>,
    pub scaler: Arc<dyn FeatureScaler>,
    pub regressor: Arc<dyn PriceRegressor>,
    pub indicators: IndicatorStore,
}

impl ModelArtifacts {
    pub fn load(config: &ArtifactEnvConfig) -> Result<Self, ArtifactError> {
        log_directory_contents(&config.models_dir);

        let regressor: Arc<dyn PriceRegressor> = match config.backend {
            ModelBackend::Onnx => Arc::new(OnnxPredictor::load(&config.model_path())?),
            ModelBackend::SmartCore => Arc::new(SmartCorePredictor::load(&config.model_path())?),
        };
        let encoder = Arc::new(ColumnEncoder::load(&config.preprocessor_path())?);
        let scaler = Arc::new(StandardScaler::load(&config.scaler_path())?);
        info!("Successfully loaded preprocessor and scaler");

        // The indicator table is optional
        let indicators = IndicatorPersistence::new(config.indicators_path()).load_store();

        Ok(Self {
            encoder,
            scaler,
            regressor,
            indicators,
        })
    }

    pub fn into_service(self) -> PredictionService {
        PredictionService::new(self.encoder, self.scaler, self.regressor, self.indicators)
    }
}

fn log_directory_contents(dir: &Path) {
    match fs::read_dir(dir) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            debug!("Files in models directory {:?}: {:?}", dir, names);
        }
        Err(e) => debug!("Cannot list models directory {:?}: {}", dir, e),
    }
}
