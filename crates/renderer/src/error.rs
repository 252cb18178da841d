//! Error types for contour extraction and document output.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid contour input: {0}")]
    InvalidInput(String),

    #[error("{styles} styles supplied for {levels} contour levels")]
    StyleMismatch { levels: usize, styles: usize },

    #[error("XML serialization failed: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
