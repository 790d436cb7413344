//! Opaque capabilities consumed by the prediction pipeline.
//!
//! Implementations are loaded once at process start and shared read-only, so
//! every trait here is `Send + Sync` and takes `&self`.

use crate::domain::ml::feature_registry::FeatureRow;
use anyhow::Result;
use ndarray::Array2;

/// Preprocessing step: turns feature rows into a numeric matrix.
pub trait FeatureEncoder: Send + Sync {
    fn transform(&self, rows: &[FeatureRow]) -> Result<Array2<f64>>;

    fn name(&self) -> &str;
}

/// Scaling step applied to the encoded matrix.
pub trait FeatureScaler: Send + Sync {
    fn transform(&self, matrix: &Array2<f64>) -> Result<Array2<f64>>;

    fn name(&self) -> &str;
}

/// Trained regression model returning one price per input row.
pub trait PriceRegressor: Send + Sync {
    fn predict(&self, matrix: &Array2<f64>) -> Result<Vec<f64>>;

    /// Get model name/type
    fn name(&self) -> &str;

    /// Get model version/id
    fn version(&self) -> &str;
}
