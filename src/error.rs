//! Error types for parqjson
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for parqjson
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Required settings missing after environment fallback, or invalid input
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ============================================================================
    // Object Store Errors
    // ============================================================================
    /// The store rejected the configured credentials
    #[error("Authentication rejected by object store: {message}")]
    Auth { message: String },

    /// The store could not be reached
    #[error("Object store unreachable: {message}")]
    Network { message: String },

    /// Nothing exists at the requested key or prefix
    #[error("No object found at '{location}'")]
    ObjectNotFound { location: String },

    /// An object transfer failed partway through
    #[error("Transfer of '{location}' failed: {message}")]
    Transfer { location: String, message: String },

    // ============================================================================
    // Conversion Errors
    // ============================================================================
    /// Downloaded bytes are not valid Parquet
    #[error("Invalid Parquet data in '{path}': {message}")]
    Format { path: String, message: String },

    /// A column's type or value has no JSON rendering
    #[error("Cannot serialize column '{column}' to JSON: {message}")]
    Serialization { column: String, message: String },

    /// JSON serialization failure
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    // ============================================================================
    // I/O and Generic Errors
    // ============================================================================
    /// Local filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything foreign
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an auth error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Create a not-found error for an object key or prefix
    pub fn not_found(location: impl Into<String>) -> Self {
        Self::ObjectNotFound {
            location: location.into(),
        }
    }

    /// Create a transfer error
    pub fn transfer(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transfer {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Create a format error for a local Parquet path
    pub fn format(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a serialization error for a column
    pub fn serialization(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Serialization {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Whether this error means the requested object simply does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ObjectNotFound { .. })
    }
}

/// Result type alias for parqjson
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("missing bucket");
        assert_eq!(err.to_string(), "Configuration error: missing bucket");

        let err = Error::not_found("events/2025-06-14.parquet");
        assert_eq!(
            err.to_string(),
            "No object found at 'events/2025-06-14.parquet'"
        );

        let err = Error::serialization("payload", "unsupported type Map");
        assert_eq!(
            err.to_string(),
            "Cannot serialize column 'payload' to JSON: unsupported type Map"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("missing").is_not_found());
        assert!(!Error::config("x").is_not_found());
        assert!(!Error::auth("denied").is_not_found());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
