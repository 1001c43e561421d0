//! Attribute mappings and the mapping catalog.
//!
//! A mapping pairs a target key (`profile.full_name`) with a source token
//! (`displayName`, `[givenName] [sn]`) and names the sync events it takes
//! part in. The catalog keeps mappings in their declared order, which is
//! also the order writes happen in.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use crate::error::SyncResult;
use crate::key::TargetReference;

/// Event a mapping is synced on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncEvent {
    /// A local account is created from a directory entry.
    CreateLocalAccount,
    /// An existing local account is refreshed from the directory (login).
    SyncToLocalAccount,
    /// A directory entry is created from a local account.
    CreateDirectoryEntry,
    /// An existing directory entry is refreshed from the local account.
    SyncToDirectoryEntry,
}

impl SyncEvent {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncEvent::CreateLocalAccount => "create_local_account",
            SyncEvent::SyncToLocalAccount => "sync_to_local_account",
            SyncEvent::CreateDirectoryEntry => "create_directory_entry",
            SyncEvent::SyncToDirectoryEntry => "sync_to_directory_entry",
        }
    }
}

impl std::fmt::Display for SyncEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SyncEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create_local_account" => Ok(SyncEvent::CreateLocalAccount),
            "sync_to_local_account" => Ok(SyncEvent::SyncToLocalAccount),
            "create_directory_entry" => Ok(SyncEvent::CreateDirectoryEntry),
            "sync_to_directory_entry" => Ok(SyncEvent::SyncToDirectoryEntry),
            _ => Err(format!("Unknown sync event: {s}")),
        }
    }
}

fn default_true() -> bool {
    true
}

/// A single declarative mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeMapping {
    /// Target key, `<category>.<name>[:<instance>]`.
    pub target_key: String,
    /// Source token: an attribute name or a bracketed template.
    pub source_token: String,
    /// Events this mapping is synced on.
    #[serde(default)]
    pub events: BTreeSet<SyncEvent>,
    /// Disabled mappings are kept in configuration but never returned.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl AttributeMapping {
    /// Create an enabled mapping with no events.
    pub fn new(target_key: impl Into<String>, source_token: impl Into<String>) -> Self {
        Self {
            target_key: target_key.into(),
            source_token: source_token.into(),
            events: BTreeSet::new(),
            enabled: true,
        }
    }

    /// Create a mapping synced on login.
    pub fn on_login(target_key: impl Into<String>, source_token: impl Into<String>) -> Self {
        Self::new(target_key, source_token).with_event(SyncEvent::SyncToLocalAccount)
    }

    /// Add an event.
    #[must_use]
    pub fn with_event(mut self, event: SyncEvent) -> Self {
        self.events.insert(event);
        self
    }

    /// Set enabled flag.
    #[must_use]
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Check if this mapping applies to an event.
    #[must_use]
    pub fn synced_on(&self, event: SyncEvent) -> bool {
        self.enabled && self.events.contains(&event)
    }

    /// Parse the target key.
    #[must_use]
    pub fn target(&self) -> TargetReference {
        TargetReference::parse(&self.target_key)
    }
}

/// The configured mapping table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingCatalog {
    mappings: Vec<AttributeMapping>,
}

impl MappingCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from a list of mappings, keeping their order.
    #[must_use]
    pub fn from_mappings(mappings: Vec<AttributeMapping>) -> Self {
        Self { mappings }
    }

    /// Load from a JSON array of mappings.
    pub fn from_json(json: &str) -> SyncResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> SyncResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Append a mapping.
    pub fn add_mapping(&mut self, mapping: AttributeMapping) {
        self.mappings.push(mapping);
    }

    /// Mappings synced on `event`, in declared order.
    #[must_use]
    pub fn mappings_for(&self, event: SyncEvent) -> Vec<&AttributeMapping> {
        self.mappings.iter().filter(|m| m.synced_on(event)).collect()
    }

    /// All mappings, including disabled ones.
    #[must_use]
    pub fn mappings(&self) -> &[AttributeMapping] {
        &self.mappings
    }

    /// Get the number of mappings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Check if there are no mappings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

impl FromIterator<AttributeMapping> for MappingCatalog {
    fn from_iter<T: IntoIterator<Item = AttributeMapping>>(iter: T) -> Self {
        Self {
            mappings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_event_roundtrip() {
        for event in [
            SyncEvent::CreateLocalAccount,
            SyncEvent::SyncToLocalAccount,
            SyncEvent::CreateDirectoryEntry,
            SyncEvent::SyncToDirectoryEntry,
        ] {
            let parsed: SyncEvent = event.as_str().parse().unwrap();
            assert_eq!(event, parsed);
        }
        assert!("sync_to_somewhere".parse::<SyncEvent>().is_err());
    }

    #[test]
    fn test_mappings_for_filters_and_keeps_order() {
        let catalog = MappingCatalog::from_mappings(vec![
            AttributeMapping::on_login("profile.b", "sn"),
            AttributeMapping::new("profile.x", "cn").with_event(SyncEvent::CreateLocalAccount),
            AttributeMapping::on_login("profile.a", "givenName"),
            AttributeMapping::on_login("profile.c", "mail").with_enabled(false),
            AttributeMapping::on_login("profile.b", "displayName"),
        ]);

        let keys: Vec<(&str, &str)> = catalog
            .mappings_for(SyncEvent::SyncToLocalAccount)
            .into_iter()
            .map(|m| (m.target_key.as_str(), m.source_token.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("profile.b", "sn"),
                ("profile.a", "givenName"),
                ("profile.b", "displayName"),
            ]
        );
    }

    #[test]
    fn test_mappings_for_no_match() {
        let catalog = MappingCatalog::from_mappings(vec![AttributeMapping::on_login(
            "profile.a",
            "cn",
        )]);
        assert!(catalog
            .mappings_for(SyncEvent::SyncToDirectoryEntry)
            .is_empty());
        assert!(MappingCatalog::new()
            .mappings_for(SyncEvent::SyncToLocalAccount)
            .is_empty());
    }

    #[test]
    fn test_catalog_from_json() {
        let json = serde_json::json!([
            {
                "target_key": "profile.full_name",
                "source_token": "[givenName] [sn]",
                "events": ["sync_to_local_account", "create_local_account"]
            },
            {
                "target_key": "property.mail",
                "source_token": "mail",
                "events": ["sync_to_local_account"],
                "enabled": false
            },
            {
                "target_key": "profile.notes",
                "source_token": "description"
            }
        ]);

        let catalog = MappingCatalog::from_json(&json.to_string()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.mappings()[0].enabled);
        assert!(!catalog.mappings()[1].enabled);
        assert!(catalog.mappings()[2].events.is_empty());

        let login = catalog.mappings_for(SyncEvent::SyncToLocalAccount);
        assert_eq!(login.len(), 1);
        assert_eq!(login[0].target_key, "profile.full_name");
    }

    #[test]
    fn test_catalog_from_invalid_json() {
        assert!(MappingCatalog::from_json("{\"not\": \"a list\"}").is_err());
    }

    #[test]
    fn test_mapping_target() {
        let mapping = AttributeMapping::on_login("[profile.aliases:2]", "mail");
        let target = mapping.target();
        assert_eq!(target.field_name(), Some("aliases"));
        assert_eq!(target.instance, Some(2));
    }
}
