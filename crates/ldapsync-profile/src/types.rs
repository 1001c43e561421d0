//! Shared value types for profile sync.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A value written into a target record field.
///
/// Bare attribute tokens keep the directory's multiplicity; templates always
/// compose to a single string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// A single string value.
    Single(String),
    /// Multiple values, in directory order.
    Multiple(Vec<String>),
}

impl FieldValue {
    /// Build from directory values: one value stays single, several become a list.
    ///
    /// Returns `None` for an empty list.
    pub fn from_values(mut values: Vec<String>) -> Option<Self> {
        match values.len() {
            0 => None,
            1 => values.pop().map(FieldValue::Single),
            _ => Some(FieldValue::Multiple(values)),
        }
    }

    /// Get as a string if this is a single value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Single(s) => Some(s),
            FieldValue::Multiple(_) => None,
        }
    }

    /// Get all values as string slices.
    pub fn as_strings(&self) -> Vec<&str> {
        match self {
            FieldValue::Single(s) => vec![s.as_str()],
            FieldValue::Multiple(values) => values.iter().map(String::as_str).collect(),
        }
    }

    /// Number of values carried.
    pub fn len(&self) -> usize {
        match self {
            FieldValue::Single(_) => 1,
            FieldValue::Multiple(values) => values.len(),
        }
    }

    /// Check if no values are carried.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Single(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(values: Vec<String>) -> Self {
        FieldValue::Multiple(values)
    }
}

/// The authenticated account a sync runs for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Local id that owns the target records.
    pub owner_id: String,
    /// Account name used to look the identity up in the directory.
    pub account_name: String,
}

impl Identity {
    /// Create a new identity.
    pub fn new(owner_id: impl Into<String>, account_name: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            account_name: account_name.into(),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.account_name, self.owner_id)
    }
}

/// Identifier of one sync invocation, time-ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncRunId(Uuid);

impl SyncRunId {
    /// Create a new time-ordered run id.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Get the inner UUID value.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SyncRunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SyncRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
