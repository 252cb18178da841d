//! Error types for configuration and input parsing.

use thiserror::Error;

/// Result type alias using IsoError.
pub type IsoResult<T> = Result<T, IsoError>;

/// Configuration and validation errors.
///
/// Everything here is detected before the first request reaches the
/// duration source.
#[derive(Debug, Error)]
pub enum IsoError {
    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Invalid BBOX: {0}")]
    InvalidBbox(String),

    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    #[error("Failed to read configuration: {0}")]
    ConfigRead(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),
}

impl IsoError {
    /// Shorthand for an invalid parameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for IsoError {
    fn from(err: std::io::Error) -> Self {
        IsoError::ConfigRead(err.to_string())
    }
}

impl From<serde_yaml::Error> for IsoError {
    fn from(err: serde_yaml::Error) -> Self {
        IsoError::ConfigParse(err.to_string())
    }
}
