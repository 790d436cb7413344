// Artifact-backed model capabilities
pub mod ml;

// Prediction orchestrator
pub mod prediction_service;
