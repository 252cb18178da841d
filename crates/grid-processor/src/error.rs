//! Error types for grid planning, sampling and interpolation.

use thiserror::Error;

/// Errors that can occur while producing a surface from samples.
#[derive(Error, Debug)]
pub enum GridProcessorError {
    /// Invalid grid parameters or insufficient data for the regression.
    #[error("domain error: {0}")]
    Domain(String),

    /// The duration source reported a condition that ends the run
    /// (quota exhausted, request denied, unreachable service).
    #[error("duration source failed: {reason}")]
    SourceFatal { reason: String },

    /// A data line of the sample table could not be parsed.
    #[error("malformed sample table line {line}: {message}")]
    Artifact { line: usize, message: String },

    /// Storage/IO error.
    #[error("storage error: {0}")]
    StorageError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl GridProcessorError {
    /// Create a Domain error.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Create a SourceFatal error.
    pub fn source_fatal(reason: impl Into<String>) -> Self {
        Self::SourceFatal {
            reason: reason.into(),
        }
    }

    /// Create an Artifact error.
    pub fn artifact(line: usize, message: impl Into<String>) -> Self {
        Self::Artifact {
            line,
            message: message.into(),
        }
    }

    /// Whether this error came from the duration source and aborted sampling.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SourceFatal { .. })
    }
}

impl From<std::io::Error> for GridProcessorError {
    fn from(err: std::io::Error) -> Self {
        Self::StorageError(err.to_string())
    }
}

impl From<iso_common::IsoError> for GridProcessorError {
    fn from(err: iso_common::IsoError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Result type for grid processor operations.
pub type Result<T> = std::result::Result<T, GridProcessorError>;
