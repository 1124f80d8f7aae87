//! Error types for training and decision operations.

use thiserror::Error;

/// Result type alias for swipe-auth operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for swipe-auth operations
///
/// A calling application must treat any of these as "cannot decide",
/// which is distinct from a BLOCK verdict.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or non-finite gesture feature
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// Empty or too small training sample
    #[error("Insufficient data: {required} samples required, got {actual}")]
    InsufficientData {
        /// Minimum number of samples the operation needs
        required: usize,
        /// Number of samples actually supplied
        actual: usize,
    },

    /// The fitted model would be unusable
    #[error("Degenerate model: {0}")]
    DegenerateModel(String),

    /// Model artifact tag or schema version not recognized
    #[error("Unsupported model variant: {0}")]
    UnsupportedModelVariant(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration source could not be read or merged
    #[error("Configuration load error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::InsufficientData`]
    pub fn insufficient(required: usize, actual: usize) -> Self {
        Error::InsufficientData { required, actual }
    }
}
