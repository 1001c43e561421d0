//! Directory error types
//!
//! Error definitions with transient/permanent classification.

use thiserror::Error;

use crate::ids::ServerId;

/// Error that can occur while talking to a directory server.
#[derive(Debug, Error)]
pub enum DirectoryError {
    // Connection errors (usually transient)
    /// Failed to establish a connection to the directory.
    #[error("connection failed: {message}")]
    ConnectionFailed {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Connection timed out.
    #[error("connection timeout after {timeout_secs} seconds")]
    ConnectionTimeout { timeout_secs: u64 },

    /// Directory is temporarily unavailable.
    #[error("directory unavailable: {message}")]
    Unavailable { message: String },

    // Permanent errors
    /// Bind credentials were rejected.
    #[error("authentication failed: invalid bind credentials")]
    AuthenticationFailed,

    /// The search for an identifier was malformed or rejected by the server.
    #[error("search failed for '{identifier}': {message}")]
    SearchFailed { identifier: String, message: String },

    /// More than one entry matched an identifier that must be unique.
    #[error("identifier '{identifier}' matched {count} entries")]
    AmbiguousIdentifier { identifier: String, count: usize },

    /// Server configuration is invalid.
    #[error("invalid configuration for server {server_id}: {message}")]
    InvalidConfiguration { server_id: ServerId, message: String },

    /// Returned data could not be interpreted.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl DirectoryError {
    /// Check if this error is transient and the lookup may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DirectoryError::ConnectionFailed { .. }
                | DirectoryError::ConnectionTimeout { .. }
                | DirectoryError::Unavailable { .. }
        )
    }

    /// Create a connection failed error.
    pub fn connection_failed(message: impl Into<String>) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: None,
        }
    }

    /// Create a connection failed error with a source.
    pub fn connection_failed_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        DirectoryError::ConnectionFailed {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a search failed error.
    pub fn search_failed(identifier: impl Into<String>, message: impl Into<String>) -> Self {
        DirectoryError::SearchFailed {
            identifier: identifier.into(),
            message: message.into(),
        }
    }

    /// Create an invalid data error.
    pub fn invalid_data(message: impl Into<String>) -> Self {
        DirectoryError::InvalidData {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        DirectoryError::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Result type for directory operations.
pub type DirectoryResult<T> = Result<T, DirectoryError>;
