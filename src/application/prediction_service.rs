//! Prediction orchestrator.
//!
//! Runs one request through
//! `Validate -> LookupIndicators -> Assemble -> Preprocess -> Scale -> Infer -> PostProcess`.
//! Capabilities are injected already loaded; nothing is read from disk here.

use crate::application::ml::{FeatureEncoder, FeatureScaler, PriceRegressor};
use crate::domain::errors::{PipelineStage, PredictionError};
use crate::domain::indicators::{EconomicIndicators, IndicatorSource, IndicatorStore};
use crate::domain::ml::feature_registry::{self, FeatureRow};
use crate::domain::request::PredictionRequest;
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of a successful prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PricePrediction {
    /// Predicted price, never negative
    pub price: f64,
    pub raw_prediction: f64,
    pub indicators: EconomicIndicators,
    pub indicator_source: IndicatorSource,
    pub features: FeatureRow,
}

pub struct PredictionService {
    encoder: Arc<dyn FeatureEncoder>,
    scaler: Arc<dyn FeatureScaler>,
    regressor: Arc<dyn PriceRegressor>,
    indicators: IndicatorStore,
}

impl PredictionService {
    pub fn new(
        encoder: Arc<dyn FeatureEncoder>,
        scaler: Arc<dyn FeatureScaler>,
        regressor: Arc<dyn PriceRegressor>,
        indicators: IndicatorStore,
    ) -> Self {
        Self {
            encoder,
            scaler,
            regressor,
            indicators,
        }
    }

    /// Validates raw request fields, then predicts.
    pub fn predict_raw(
        &self,
        region: &str,
        size_bracket: &str,
        year: &str,
        quarter: &str,
        market_type: &str,
    ) -> Result<PricePrediction, PredictionError> {
        debug!(stage = %PipelineStage::Validate, "Validating request");
        let request = PredictionRequest::parse(region, size_bracket, year, quarter, market_type)
            .inspect_err(|e| warn!(stage = %PipelineStage::Validate, "Rejected request: {}", e))?;
        self.predict(&request)
    }

    pub fn predict(&self, request: &PredictionRequest) -> Result<PricePrediction, PredictionError> {
        info!(
            "Predicting for region={}, year={}, quarter={}, size={}, market={}",
            request.region(),
            request.year(),
            request.quarter(),
            request.size_bracket(),
            request.market_type()
        );

        let lookup = self.indicators.lookup(request.year(), request.quarter());
        match lookup.source {
            IndicatorSource::Exact(period) => {
                info!(stage = %PipelineStage::LookupIndicators, "Found economic indicators for {}", period)
            }
            IndicatorSource::Nearest { .. } => {
                info!(stage = %PipelineStage::LookupIndicators, "Using {} economic indicators", lookup.source)
            }
            IndicatorSource::Default => warn!(
                stage = %PipelineStage::LookupIndicators,
                "No economic indicators found for {}-Q{}, using defaults",
                request.year(),
                request.quarter()
            ),
        }
        let indicators = lookup.indicators;
        info!(
            stage = %PipelineStage::LookupIndicators,
            interest = indicators.interest_rate,
            inflation = indicators.inflation,
            gdp = indicators.gdp_growth,
            unemployment = indicators.unemployment,
            apartments_sold = indicators.apartments_sold,
            source = %lookup.source,
            "Resolved economic indicators"
        );

        let features = feature_registry::assemble(request, &indicators);
        debug!(stage = %PipelineStage::Assemble, ?features, "Prepared input row");

        let encoded = self
            .encoder
            .transform(std::slice::from_ref(&features))
            .map_err(|e| self.fail(PipelineStage::Preprocess, e))?;
        debug!(
            stage = %PipelineStage::Preprocess,
            encoder = self.encoder.name(),
            columns = encoded.ncols(),
            "Encoded feature row"
        );

        let scaled = self
            .scaler
            .transform(&encoded)
            .map_err(|e| self.fail(PipelineStage::Scale, e))?;
        info!(
            stage = %PipelineStage::Scale,
            scaler = self.scaler.name(),
            columns = scaled.ncols(),
            "Preprocessed and scaled input data"
        );

        let raw_prediction = self
            .regressor
            .predict(&scaled)
            .and_then(|values| {
                values
                    .first()
                    .copied()
                    .ok_or_else(|| anyhow!("{} returned no prediction", self.regressor.name()))
            })
            .map_err(|e| self.fail(PipelineStage::Infer, e))?;
        info!(
            stage = %PipelineStage::Infer,
            model = self.regressor.name(),
            version = self.regressor.version(),
            "Raw model prediction: {}",
            raw_prediction
        );

        let price = post_process(raw_prediction);
        if !price.is_finite() {
            warn!(stage = %PipelineStage::PostProcess, "Model produced a non-finite price: {}", price);
        }
        info!(stage = %PipelineStage::PostProcess, "Final prediction: {}", price);

        Ok(PricePrediction {
            price,
            raw_prediction,
            indicators,
            indicator_source: lookup.source,
            features,
        })
    }

    fn fail(&self, stage: PipelineStage, source: anyhow::Error) -> PredictionError {
        error!(stage = %stage, "Prediction failed: {:#}", source);
        PredictionError::stage(stage, source)
    }
}

/// Prices are reported as magnitudes regardless of the model's sign.
pub fn post_process(raw_prediction: f64) -> f64 {
    raw_prediction.abs()
}
