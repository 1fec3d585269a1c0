//! Error types for rstpage operations.

use thiserror::Error;

use crate::render::RenderError;

/// Errors that can occur while rendering and restructuring a document.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("HTML decoding error: {0}")]
    Parse(String),

    /// The document does not have the shape the page layout depends on.
    ///
    /// The source is an authored asset, so this always points at a content
    /// or programming mistake rather than a transient failure.
    #[error("Invalid document structure: {0}")]
    Structure(String),

    #[cfg(feature = "cli")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
