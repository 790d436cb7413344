pub mod artifacts;
pub mod indicator_persistence;

pub use artifacts::ModelArtifacts;
pub use indicator_persistence::IndicatorPersistence;
