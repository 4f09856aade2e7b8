//! Error types for seekpage
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for seekpage
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Errors (client input)
    // ============================================================================
    #[error("Invalid cursor: {message}")]
    InvalidCursor { message: String },

    #[error("Unsupported cursor version {version} (expected {expected})")]
    UnsupportedCursorVersion { version: u64, expected: u64 },

    #[error("Cursor is keyed on '{found}' but pagination key is '{expected}'")]
    CursorKeyMismatch { expected: String, found: String },

    #[error("Only one of afterCursor and beforeCursor may be set")]
    ConflictingCursors,

    #[error("Invalid limit {limit}: must be at least 1")]
    InvalidLimit { limit: usize },

    #[error("Invalid page {page}: pages start at 1 and the row offset must fit in usize")]
    InvalidPage { page: usize },

    // ============================================================================
    // Record Errors
    // ============================================================================
    #[error("Record is missing pagination key field '{field}'")]
    MissingKeyField { field: String },

    #[error("Cursor value for '{field}' must be a string, number or boolean")]
    UnsupportedKeyValue { field: String },

    #[error("Failed to decode record: {message}")]
    Decode { message: String },

    // ============================================================================
    // Data Source Errors
    // ============================================================================
    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Data source error: {message}")]
    DataSource { message: String },

    #[error("Unsupported by this data source: {message}")]
    Unsupported { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

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

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid cursor error
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidCursor {
            message: message.into(),
        }
    }

    /// Create a missing key field error
    pub fn missing_key(field: impl Into<String>) -> Self {
        Self::MissingKeyField {
            field: field.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create a data source error
    pub fn data_source(message: impl Into<String>) -> Self {
        Self::DataSource {
            message: message.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Check if this error was caused by bad caller input
    ///
    /// Transport layers map these to a "bad request" response.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidCursor { .. }
                | Error::UnsupportedCursorVersion { .. }
                | Error::CursorKeyMismatch { .. }
                | Error::ConflictingCursors
                | Error::InvalidLimit { .. }
                | Error::InvalidPage { .. }
        )
    }
}

/// Result type alias for seekpage
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("table");
        assert_eq!(err.to_string(), "Missing required config field: table");

        let err = Error::InvalidLimit { limit: 0 };
        assert_eq!(err.to_string(), "Invalid limit 0: must be at least 1");

        let err = Error::CursorKeyMismatch {
            expected: "id".to_string(),
            found: "created_at".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cursor is keyed on 'created_at' but pagination key is 'id'"
        );
    }

    #[test]
    fn test_is_client_error() {
        assert!(Error::invalid_cursor("bad base64").is_client_error());
        assert!(Error::ConflictingCursors.is_client_error());
        assert!(Error::InvalidLimit { limit: 0 }.is_client_error());
        assert!(Error::InvalidPage { page: 0 }.is_client_error());
        assert!(Error::UnsupportedCursorVersion {
            version: 9,
            expected: 1
        }
        .is_client_error());

        assert!(!Error::data_source("connection reset").is_client_error());
        assert!(!Error::missing_key("id").is_client_error());
        assert!(!Error::config("test").is_client_error());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
