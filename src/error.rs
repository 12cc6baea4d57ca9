//! Error types
//!
//! None of the numerical conditions inside a fusion cycle are errors; they are
//! absorbed by the session. Only input records and configuration can fail.

use thiserror::Error;

/// A record from the sample stream that could not be turned into a [`Sample`](crate::Sample)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RecordError {
    #[error("Empty record")]
    Empty,
    #[error("Record is not valid UTF-8")]
    InvalidEncoding,
    #[error("Expected 3 or 6 fields, found {0}")]
    FieldCount(usize),
    #[error("Field {index} is not a number: {value:?}")]
    InvalidNumber { index: usize, value: String },
    #[error("Field {index} is not finite")]
    NonFinite { index: usize },
}

/// Rejected fusion settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("Time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
    #[error("Filter gain alpha must lie in [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("Initial orientation has zero or non-finite norm")]
    DegenerateInitialOrientation,
}

/// Failure loading or saving settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Could not parse settings: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Could not serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Invalid settings: {0}")]
    Invalid(#[from] SettingsError),
}
