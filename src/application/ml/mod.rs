pub mod column_encoder;
pub mod onnx_predictor;
pub mod predictor;
pub mod smartcore_predictor;
pub mod standard_scaler;

pub use predictor::{FeatureEncoder, FeatureScaler, PriceRegressor};
