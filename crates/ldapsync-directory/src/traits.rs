//! Directory traits
//!
//! The seams between the sync engine and whatever actually talks LDAP.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::DirectoryResult;
use crate::ids::ServerId;
use crate::record::DirectoryRecord;

/// A client bound to one directory server.
///
/// Connection handling, binding and search filters belong to the
/// implementation; the sync engine only asks for a record by identifier.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// The server this client is bound to.
    fn server_id(&self) -> &ServerId;

    /// Fetch the entry for an identifier (usually the account name).
    ///
    /// Returns `Ok(None)` when the directory has no entry for the identifier.
    /// Errors are reserved for faults talking to the server.
    async fn get_record_by_identifier(
        &self,
        identifier: &str,
    ) -> DirectoryResult<Option<DirectoryRecord>>;
}

/// Selects the client for a configured server.
#[async_trait]
pub trait DirectoryResolver: Send + Sync {
    /// Get the client for a server, or `None` if the server is unknown.
    async fn resolve(
        &self,
        server_id: &ServerId,
    ) -> DirectoryResult<Option<Arc<dyn DirectoryClient>>>;
}
