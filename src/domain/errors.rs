use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while validating the raw request fields
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Region must be a non-empty string")]
    EmptyRegion,

    #[error("Size must be one of: {expected}")]
    UnknownSizeBracket { value: String, expected: String },

    #[error("Year must be a valid integer, got '{value}'")]
    InvalidYear { value: String },

    #[error("Year must be between {min} and {max}, got {year}")]
    YearOutOfRange { year: i64, min: i32, max: i32 },

    #[error("Quarter must be a valid integer, got '{value}'")]
    InvalidQuarter { value: String },

    #[error("Quarter must be between 1 and 4, got {quarter}")]
    QuarterOutOfRange { quarter: i64 },

    #[error("Market type must be one of: {expected}")]
    UnknownMarketType { value: String, expected: String },
}

/// Errors raised while loading model, encoder or scaler artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("{artifact} artifact not found: {path:?}")]
    Missing {
        artifact: &'static str,
        path: PathBuf,
    },

    #[error("{artifact} artifact at {path:?} is corrupt: {reason}")]
    Corrupt {
        artifact: &'static str,
        path: PathBuf,
        reason: String,
    },
}

/// Steps of the prediction pipeline, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Validate,
    LookupIndicators,
    Assemble,
    Preprocess,
    Scale,
    Infer,
    PostProcess,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Validate => "validate",
            PipelineStage::LookupIndicators => "lookup_indicators",
            PipelineStage::Assemble => "assemble",
            PipelineStage::Preprocess => "preprocess",
            PipelineStage::Scale => "scale",
            PipelineStage::Infer => "infer",
            PipelineStage::PostProcess => "post_process",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced by the prediction orchestrator
#[derive(Debug, Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{stage} stage failed: {source:#}")]
    Stage {
        stage: PipelineStage,
        #[source]
        source: anyhow::Error,
    },
}

impl PredictionError {
    pub fn stage(stage: PipelineStage, source: anyhow::Error) -> Self {
        PredictionError::Stage { stage, source }
    }

    /// Stage at which the pipeline stopped
    pub fn failed_stage(&self) -> PipelineStage {
        match self {
            PredictionError::Validation(_) => PipelineStage::Validate,
            PredictionError::Stage { stage, .. } => *stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_formatting() {
        let err = ValidationError::YearOutOfRange {
            year: 2026,
            min: 2010,
            max: 2025,
        };
        let msg = err.to_string();
        assert!(msg.contains("2010"));
        assert!(msg.contains("2025"));
        assert!(msg.contains("2026"));
    }

    #[test]
    fn test_stage_error_carries_stage_and_cause() {
        let err = PredictionError::stage(
            PipelineStage::Scale,
            anyhow::anyhow!("expected 10 columns, got 9"),
        );
        assert_eq!(err.failed_stage(), PipelineStage::Scale);
        let msg = err.to_string();
        assert!(msg.starts_with("scale stage failed"));
        assert!(msg.contains("expected 10 columns"));
    }

    #[test]
    fn test_validation_maps_to_validate_stage() {
        let err: PredictionError = ValidationError::EmptyRegion.into();
        assert_eq!(err.failed_stage(), PipelineStage::Validate);
        assert_eq!(err.to_string(), "Region must be a non-empty string");
    }
}
