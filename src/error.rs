// src/error.rs

//! Unified error handling for the crawler and renderer.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Remote API answered with something unusable
    #[error("Remote fetch failed for {context}: {message}")]
    Remote {
        context: String,
        status: Option<u16>,
        message: String,
    },

    /// A persisted file does not match the expected schema
    #[error("Schema mismatch in {path}: {message}")]
    Schema { path: String, message: String },

    /// Template missing or unreadable
    #[error("Template error for '{name}': {message}")]
    Template { name: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a remote fetch error without an HTTP status.
    pub fn remote(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Remote {
            context: context.into(),
            status: None,
            message: message.to_string(),
        }
    }

    /// Create a remote fetch error carrying the HTTP status of the response.
    pub fn remote_status(context: impl Into<String>, status: u16, message: impl fmt::Display) -> Self {
        Self::Remote {
            context: context.into(),
            status: Some(status),
            message: message.to_string(),
        }
    }

    /// Create a schema mismatch error for a persisted file.
    pub fn schema(path: &Path, message: impl fmt::Display) -> Self {
        Self::Schema {
            path: path.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a template error.
    pub fn template(name: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Template {
            name: name.into(),
            message: message.to_string(),
        }
    }

    /// Whether the remote reported the resource as absent.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Remote { status: Some(404), .. })
    }
}
