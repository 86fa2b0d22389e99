//! Error handling for the oasdoc library.
//!
//! Only structural failures at parse/load time are surfaced as errors.
//! Broken references inside an otherwise valid document are deliberately
//! not represented here: reference resolution is total and degrades to
//! placeholder schemas, emitting `tracing` warnings instead.

use thiserror::Error;

/// Result type for oasdoc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for oasdoc operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raw content is neither valid JSON nor valid YAML
    #[error("Invalid document format: {0}")]
    Format(String),

    /// Parsed content is not a recognizable Swagger/OpenAPI document
    #[error("Not a Swagger/OpenAPI document: {0}")]
    Document(String),

    /// Loader-level failure (unsupported scheme, HTTP status, ...)
    #[error("Document loading error: {0}")]
    Load(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a new format error
    pub fn format<S: Into<String>>(msg: S) -> Self {
        Self::Format(msg.into())
    }

    /// Create a new document-structure error
    pub fn document<S: Into<String>>(msg: S) -> Self {
        Self::Document(msg.into())
    }

    /// Create a new loader error
    pub fn load<S: Into<String>>(msg: S) -> Self {
        Self::Load(msg.into())
    }
}
