//! # Directory Framework
//!
//! Directory-side abstractions for LDAP profile synchronization.
//!
//! The sync engine never talks LDAP itself. It asks a [`DirectoryResolver`]
//! for the client of the configured provisioning server and then asks that
//! [`DirectoryClient`] for the entry of an authenticated account.
//!
//! ## Example
//!
//! ```ignore
//! use ldapsync_directory::prelude::*;
//!
//! let registry = ServerRegistry::new();
//! registry.register(Arc::new(my_ldap_client)).await;
//!
//! let client = registry.resolve(&ServerId::new("corp_ad")).await?.unwrap();
//! if let Some(record) = client.get_record_by_identifier("jdoe").await? {
//!     println!("{:?}", record.first_string("displayName"));
//! }
//! ```
//!
//! ## Crate Organization
//!
//! - [`ids`] - Type-safe identifiers (`ServerId`)
//! - [`error`] - Error types with transient/permanent classification
//! - [`record`] - `DirectoryRecord`, a case-insensitive multi-valued entry
//! - [`traits`] - `DirectoryClient` and `DirectoryResolver`
//! - [`registry`] - `ServerRegistry`, the in-process resolver

pub mod error;
pub mod ids;
pub mod record;
pub mod registry;
pub mod traits;

pub use error::{DirectoryError, DirectoryResult};
pub use ids::ServerId;
pub use record::{DirectoryAttribute, DirectoryRecord, DN_ATTRIBUTE};
pub use registry::{BoxedDirectoryClient, ServerRegistry};
pub use traits::{DirectoryClient, DirectoryResolver};

/// Prelude module for convenient imports.
///
/// ```
/// use ldapsync_directory::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{DirectoryError, DirectoryResult};
    pub use crate::ids::ServerId;
    pub use crate::record::{DirectoryAttribute, DirectoryRecord};
    pub use crate::registry::{BoxedDirectoryClient, ServerRegistry};
    pub use crate::traits::{DirectoryClient, DirectoryResolver};
}

// Re-export async_trait for client implementors
pub use async_trait::async_trait;
