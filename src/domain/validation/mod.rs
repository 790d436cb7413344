pub mod request_validator;

pub use request_validator::{ValidatedFields, validate};
