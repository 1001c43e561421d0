//! Directory server registry
//!
//! Holds the clients for every configured server and hands them out by id.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::DirectoryResult;
use crate::ids::ServerId;
use crate::traits::{DirectoryClient, DirectoryResolver};

/// Type alias for a shared directory client.
pub type BoxedDirectoryClient = Arc<dyn DirectoryClient>;

/// In-process registry of directory clients keyed by server id.
#[derive(Default)]
pub struct ServerRegistry {
    clients: RwLock<HashMap<ServerId, BoxedDirectoryClient>>,
}

impl ServerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a client under its own server id.
    ///
    /// Returns the client previously registered for that id, if any.
    pub async fn register(&self, client: BoxedDirectoryClient) -> Option<BoxedDirectoryClient> {
        let server_id = client.server_id().clone();
        let previous = self.clients.write().await.insert(server_id.clone(), client);
        if previous.is_some() {
            info!(server_id = %server_id, "Replaced directory client");
        } else {
            debug!(server_id = %server_id, "Registered directory client");
        }
        previous
    }

    /// Remove a client.
    pub async fn unregister(&self, server_id: &ServerId) -> Option<BoxedDirectoryClient> {
        self.clients.write().await.remove(server_id)
    }

    /// Get a client by server id.
    pub async fn get(&self, server_id: &ServerId) -> Option<BoxedDirectoryClient> {
        self.clients.read().await.get(server_id).cloned()
    }

    /// Ids of all registered servers, sorted.
    pub async fn server_ids(&self) -> Vec<ServerId> {
        let mut ids: Vec<ServerId> = self.clients.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered clients.
    pub async fn len(&self) -> usize {
        self.clients.read().await.len()
    }

    /// Check if no clients are registered.
    pub async fn is_empty(&self) -> bool {
        self.clients.read().await.is_empty()
    }
}

#[async_trait]
impl DirectoryResolver for ServerRegistry {
    async fn resolve(&self, server_id: &ServerId) -> DirectoryResult<Option<BoxedDirectoryClient>> {
        Ok(self.get(server_id).await)
    }
}

impl std::fmt::Debug for ServerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerRegistry").finish_non_exhaustive()
    }
}
