//! Shared test helpers: logging setup and hand-written collaborator mocks.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use ldapsync_directory::prelude::*;
use ldapsync_profile::{AttributeCategory, ProfileRecord, RecordStore, StoreError, StoreResult};

static INIT: Once = Once::new();

/// Initialize logging for tests (once).
pub fn init_test_logging() {
    INIT.call_once(|| {
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::fmt()
                .with_test_writer()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .try_init()
                .ok();
        }
    });
}

pub const SERVER: &str = "corp_ad";

// =============================================================================
// Mock directory client
// =============================================================================

/// Directory client backed by a map of account name to record.
pub struct MockDirectoryClient {
    server_id: ServerId,
    records: HashMap<String, DirectoryRecord>,
    fail: AtomicBool,
    lookups: AtomicUsize,
}

impl MockDirectoryClient {
    #[must_use]
    pub fn new(server: &str) -> Self {
        Self {
            server_id: ServerId::new(server),
            records: HashMap::new(),
            fail: AtomicBool::new(false),
            lookups: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_record(mut self, account_name: &str, record: DirectoryRecord) -> Self {
        self.records.insert(account_name.to_string(), record);
        self
    }

    /// Make every lookup fail with a connection error.
    #[must_use]
    pub fn failing(self) -> Self {
        self.fail.store(true, Ordering::SeqCst);
        self
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryClient for MockDirectoryClient {
    fn server_id(&self) -> &ServerId {
        &self.server_id
    }

    async fn get_record_by_identifier(
        &self,
        identifier: &str,
    ) -> DirectoryResult<Option<DirectoryRecord>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(DirectoryError::connection_failed("ldap://dc1:389 refused"));
        }
        Ok(self.records.get(identifier).cloned())
    }
}

/// Registry holding one mock client under [`SERVER`].
pub async fn registry_with(client: Arc<MockDirectoryClient>) -> Arc<ServerRegistry> {
    let registry = ServerRegistry::new();
    registry.register(client).await;
    Arc::new(registry)
}

// =============================================================================
// Mock record store
// =============================================================================

/// In-memory record store that counts saves per record.
#[derive(Default)]
pub struct MemoryRecordStore {
    records: Mutex<Vec<(AttributeCategory, ProfileRecord)>>,
    saves: Mutex<HashMap<String, usize>>,
    failing_saves: Mutex<HashSet<String>>,
    fail_loads: AtomicBool,
    loads: AtomicUsize,
}

impl MemoryRecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, category: AttributeCategory, record: ProfileRecord) {
        self.records.lock().unwrap().push((category, record));
    }

    #[must_use]
    pub fn with(self, category: AttributeCategory, record: ProfileRecord) -> Self {
        self.insert(category, record);
        self
    }

    /// Saves of `record_id` will fail.
    pub fn fail_saves_for(&self, record_id: &str) {
        self.failing_saves
            .lock()
            .unwrap()
            .insert(record_id.to_string());
    }

    /// Every load will fail.
    pub fn fail_loads(&self) {
        self.fail_loads.store(true, Ordering::SeqCst);
    }

    pub fn get(&self, record_id: &str) -> Option<ProfileRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|(_, r)| r.id == record_id)
            .map(|(_, r)| r.clone())
    }

    pub fn saves_of(&self, record_id: &str) -> usize {
        self.saves
            .lock()
            .unwrap()
            .get(record_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_saves(&self) -> usize {
        self.saves.lock().unwrap().values().sum()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    type Record = ProfileRecord;

    async fn load_owned_records(
        &self,
        category: &AttributeCategory,
        owner_id: &str,
    ) -> StoreResult<Vec<ProfileRecord>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::load(category.as_str(), owner_id, "connection reset"));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|(c, r)| c == category && r.owner_id == owner_id)
            .map(|(_, r)| r.clone())
            .collect())
    }

    async fn save(&self, record: &ProfileRecord) -> StoreResult<()> {
        if self.failing_saves.lock().unwrap().contains(&record.id) {
            return Err(StoreError::save(&record.id, "unique constraint violated"));
        }

        let mut records = self.records.lock().unwrap();
        if let Some((_, stored)) = records.iter_mut().find(|(_, r)| r.id == record.id) {
            *stored = record.clone();
        }
        *self
            .saves
            .lock()
            .unwrap()
            .entry(record.id.clone())
            .or_insert(0) += 1;
        Ok(())
    }
}
