//! Sync error types.

use ldapsync_directory::{DirectoryError, ServerId};
use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Records could not be loaded.
    #[error("failed to load {category} records for owner {owner_id}: {message}")]
    Load {
        category: String,
        owner_id: String,
        message: String,
    },

    /// A record could not be saved.
    #[error("failed to save record {record_id}: {message}")]
    Save {
        record_id: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store is unavailable.
    #[error("record store unavailable: {message}")]
    Unavailable { message: String },
}

impl StoreError {
    /// Create a load error.
    pub fn load(
        category: impl Into<String>,
        owner_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Load {
            category: category.into(),
            owner_id: owner_id.into(),
            message: message.into(),
        }
    }

    /// Create a save error.
    pub fn save(record_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Save {
            record_id: record_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }
}

/// Result type for record store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that abort a sync invocation.
///
/// Conditions the engine recognizes (no server configured, no directory
/// entry, inapplicable mappings, per-record save failures) are reported in
/// the outcome instead.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Directory client error.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Record store error.
    #[error("Record store error: {0}")]
    Store(#[from] StoreError),

    /// The configured provisioning server is not known to the resolver.
    #[error("Provisioning server not found: {server_id}")]
    ServerNotFound { server_id: ServerId },

    /// Settings could not be read.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Create a server not found error.
    pub fn server_not_found(server_id: ServerId) -> Self {
        Self::ServerNotFound { server_id }
    }

    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Directory(e) => e.is_transient(),
            SyncError::Store(StoreError::Unavailable { .. }) => true,
            SyncError::Io(_) => true,
            _ => false,
        }
    }
}

/// Result type for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;
