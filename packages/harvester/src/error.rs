//! Error types for the harvester.
//!
//! Record-level problems (a listing with a missing field or a bad date) are
//! not errors: they are logged and the record is dropped. Everything here
//! aborts the operation that raised it.

use thiserror::Error;

/// Main error type for the harvester library.
#[derive(Debug, Error)]
pub enum HarvesterError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with something other than 200 OK.
    #[error("Unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Response was valid JSON but not the expected envelope.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Header argument could not be used as an HTTP header.
    #[error("Invalid header: '{0}'. Expected 'Name: value'")]
    InvalidHeader(String),

    /// API base URL could not be parsed.
    #[error("Invalid API URL: '{0}'")]
    InvalidUrl(String),

    /// Page template failed to render.
    #[error("Template rendering failed: {0}")]
    Template(#[from] tera::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for harvester operations.
pub type Result<T> = std::result::Result<T, HarvesterError>;
