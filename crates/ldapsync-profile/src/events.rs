//! Login trigger.
//!
//! Authentication is handled elsewhere. Whatever dispatches login events
//! hands each successful login to a [`LoginSubscriber`], which runs one
//! profile sync for the account.

use chrono::{DateTime, Utc};
use ldapsync_directory::DirectoryResolver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument};

use crate::engine::{ProfileSyncEngine, SyncOutcome};
use crate::error::SyncResult;
use crate::store::RecordStore;
use crate::types::Identity;

/// Successful authentication of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginEvent {
    /// The authenticated account.
    pub identity: Identity,
    /// When the login happened.
    pub occurred_at: DateTime<Utc>,
}

impl LoginEvent {
    /// Event name used by dispatchers.
    pub const NAME: &'static str = "ldap_user.login";

    /// Create an event stamped with the current time.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            occurred_at: Utc::now(),
        }
    }
}

/// Runs a profile sync for every login it receives.
pub struct LoginSubscriber<R: DirectoryResolver, S: RecordStore> {
    engine: Arc<ProfileSyncEngine<R, S>>,
}

impl<R: DirectoryResolver, S: RecordStore> LoginSubscriber<R, S> {
    /// Create a subscriber around an engine.
    pub fn new(engine: Arc<ProfileSyncEngine<R, S>>) -> Self {
        Self { engine }
    }

    /// Events this subscriber handles.
    #[must_use]
    pub fn subscribed_events() -> &'static [&'static str] {
        &[LoginEvent::NAME]
    }

    /// Handle a login: sync the account's profile fields once.
    #[instrument(skip(self, event), fields(account = %event.identity.account_name))]
    pub async fn on_login(&self, event: &LoginEvent) -> SyncResult<SyncOutcome> {
        info!(occurred_at = %event.occurred_at, "Handling login event");
        self.engine.sync(&event.identity).await
    }
}
