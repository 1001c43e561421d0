//! Local record store seam.
//!
//! The engine never knows the concrete shape of a local record. It only asks
//! whether a field exists and sets it; the store decides what records an
//! owner has and how they are persisted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StoreResult;
use crate::key::AttributeCategory;
use crate::types::FieldValue;

/// Field access on a local record.
pub trait TargetRecord: Send + Sync {
    /// Stable id of the record, for logs and failure reports.
    fn record_id(&self) -> String;

    /// Check if the record has a field called `name`.
    fn has_field(&self, name: &str) -> bool;

    /// Set a field. Only called after `has_field` returned true.
    fn set_field(&mut self, name: &str, value: FieldValue);
}

/// Loads and persists the records an identity owns.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Concrete record variant handled by this store.
    type Record: TargetRecord;

    /// Load every record in `category` owned by `owner_id` (zero, one or many).
    async fn load_owned_records(
        &self,
        category: &AttributeCategory,
        owner_id: &str,
    ) -> StoreResult<Vec<Self::Record>>;

    /// Persist one record.
    async fn save(&self, record: &Self::Record) -> StoreResult<()>;
}

/// A profile record: a typed bundle of named fields owned by an account.
///
/// Fields are declared up front; a declared field may still be empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Record id.
    pub id: String,
    /// Owning account.
    pub owner_id: String,
    /// Profile type (e.g. `"main"`, `"employee"`).
    pub bundle: String,
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl ProfileRecord {
    /// Create a record with no fields.
    pub fn new(
        id: impl Into<String>,
        owner_id: impl Into<String>,
        bundle: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_id: owner_id.into(),
            bundle: bundle.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Declare an empty field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>) -> Self {
        self.fields.entry(name.into()).or_insert(None);
        self
    }

    /// Declare a field with a value.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(name.into(), Some(value.into()));
        self
    }

    /// Get a field value. `None` when the field is missing or empty.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name).and_then(Option::as_ref)
    }

    /// Names of the declared fields.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl TargetRecord for ProfileRecord {
    fn record_id(&self) -> String {
        self.id.clone()
    }

    fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        if let Some(slot) = self.fields.get_mut(name) {
            *slot = Some(value);
        }
    }
}
