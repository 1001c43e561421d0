//! # LDAP Profile Sync
//!
//! Copies directory attributes into local profile records when an account
//! logs in.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │   Login Event   │────►│ ProfileSyncEngine │────►│ DirectoryClient  │
//! │ LoginSubscriber │     │                   │     │ (via resolver)   │
//! └─────────────────┘     └─────────┬─────────┘     └──────────────────┘
//!                                   │
//!         ┌─────────────────────────┼─────────────────────────┐
//!         ▼                         ▼                         ▼
//! ┌───────────────┐       ┌─────────────────┐       ┌─────────────────┐
//! │ MappingCatalog│       │  TokenResolver  │       │   RecordStore   │
//! │ (per event)   │       │ + key parsing   │       │ (load / save)   │
//! └───────────────┘       └─────────────────┘       └─────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use ldapsync_profile::prelude::*;
//!
//! let engine = ProfileSyncEngine::from_env(registry, store)?;
//!
//! let outcome = engine.sync(&Identity::new("42", "jdoe")).await?;
//! if let Some(report) = outcome.report() {
//!     println!("{} mappings applied", report.mappings_applied);
//! }
//! ```

pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod events;
pub mod key;
pub mod mapping;
pub mod store;
pub mod token;
pub mod types;

// Re-exports for convenience
pub use config::{ConfigError, SyncSettings};
pub use diagnostic::{
    DiagnosticEntry, DiagnosticLog, MemoryDiagnosticLog, TracingDiagnosticLog, PROFILE_CHANNEL,
    USER_CHANNEL,
};
pub use engine::{
    NotFoundReason, PersistFailure, ProfileSyncEngine, SkipReason, SkippedMapping, SyncOutcome,
    SyncReport,
};
pub use error::{StoreError, StoreResult, SyncError, SyncResult};
pub use events::{LoginEvent, LoginSubscriber};
pub use key::{parse_attribute_key, AttributeCategory, TargetReference};
pub use mapping::{AttributeMapping, MappingCatalog, SyncEvent};
pub use store::{ProfileRecord, RecordStore, TargetRecord};
pub use token::{Conversion, TokenResolver};
pub use types::{FieldValue, Identity, SyncRunId};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::SyncSettings;
    pub use crate::diagnostic::{DiagnosticLog, MemoryDiagnosticLog, TracingDiagnosticLog};
    pub use crate::engine::{ProfileSyncEngine, SyncOutcome, SyncReport};
    pub use crate::error::{StoreError, StoreResult, SyncError, SyncResult};
    pub use crate::events::{LoginEvent, LoginSubscriber};
    pub use crate::key::{AttributeCategory, TargetReference};
    pub use crate::mapping::{AttributeMapping, MappingCatalog, SyncEvent};
    pub use crate::store::{ProfileRecord, RecordStore, TargetRecord};
    pub use crate::token::TokenResolver;
    pub use crate::types::{FieldValue, Identity};
    pub use ldapsync_directory::prelude::*;
}
