pub mod errors;
pub mod indicators;
pub mod ml;
pub mod request;
pub mod validation;
