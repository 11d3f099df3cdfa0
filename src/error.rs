//! Error types for cartoee.
//!
//! This module defines a single error enum covering argument validation,
//! configuration conflicts, upstream imagery failures and rendering problems.

use thiserror::Error;

/// The main error type for cartoee operations.
#[derive(Error, Debug)]
pub enum CartoeeError {
    /// Argument has the wrong shape or an unusable value
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Mutually exclusive options were combined, or a required one is missing
    #[error("Configuration conflict: {message}")]
    ConfigConflict { message: String },

    /// The imagery service answered with a non-success status
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    /// Transport-level HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Image decoding/encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Drawing errors raised by an axes implementation
    #[error("Render error: {message}")]
    Render { message: String },
}

impl CartoeeError {
    /// Shorthand for [`CartoeeError::InvalidParameter`].
    pub fn invalid(param: &str, message: impl Into<String>) -> Self {
        CartoeeError::InvalidParameter {
            param: param.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for [`CartoeeError::ConfigConflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        CartoeeError::ConfigConflict {
            message: message.into(),
        }
    }
}

/// Convenience type alias for Results with CartoeeError
pub type Result<T> = std::result::Result<T, CartoeeError>;
