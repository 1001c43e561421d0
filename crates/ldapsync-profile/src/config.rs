//! Sync settings.
//!
//! Settings are read from environment variables through a reader closure so
//! tests can supply values without touching process-global state.

use ldapsync_directory::ServerId;
use std::path::PathBuf;

use crate::error::SyncResult;
use crate::key::AttributeCategory;
use crate::mapping::MappingCatalog;

/// Settings for the profile sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    /// Directory server used for provisioning lookups. `None` disables sync.
    pub provision_server: Option<ServerId>,

    /// Category of local records the engine writes to.
    /// Default: `profile`.
    pub target_category: AttributeCategory,

    /// Emit detailed diagnostic notices.
    /// Default: false.
    pub detail_log: bool,

    /// Path to the JSON mapping table, if mappings come from a file.
    pub mappings_file: Option<PathBuf>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            provision_server: None,
            target_category: AttributeCategory::Profile,
            detail_log: false,
            mappings_file: None,
        }
    }
}

impl SyncSettings {
    /// Create settings that provision from `server`.
    pub fn new(server: impl Into<ServerId>) -> Self {
        Self {
            provision_server: Some(server.into()),
            ..Self::default()
        }
    }

    /// Set the target category.
    #[must_use]
    pub fn with_target_category(mut self, category: AttributeCategory) -> Self {
        self.target_category = category;
        self
    }

    /// Enable detailed diagnostics.
    #[must_use]
    pub fn with_detail_log(mut self, detail: bool) -> Self {
        self.detail_log = detail;
        self
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let provision_server = match reader("LDAP_PROVISION_SERVER") {
            Ok(value) if value.trim().is_empty() => None,
            Ok(value) => Some(ServerId::parse(&value).map_err(|e| {
                ConfigError::InvalidValue("LDAP_PROVISION_SERVER".into(), e)
            })?),
            Err(std::env::VarError::NotPresent) => None,
            Err(e) => {
                return Err(ConfigError::InvalidValue(
                    "LDAP_PROVISION_SERVER".into(),
                    e.to_string(),
                ))
            }
        };

        let target_category = reader("LDAP_PROFILE_TARGET_CATEGORY")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map_or(AttributeCategory::Profile, |v| AttributeCategory::from_name(&v));

        let detail_log = match reader("LDAP_DETAIL_LOG") {
            Ok(value) => parse_bool(&value).ok_or_else(|| {
                ConfigError::InvalidValue("LDAP_DETAIL_LOG".into(), format!("not a boolean: {value}"))
            })?,
            Err(std::env::VarError::NotPresent) => false,
            Err(e) => {
                return Err(ConfigError::InvalidValue(
                    "LDAP_DETAIL_LOG".into(),
                    e.to_string(),
                ))
            }
        };

        let mappings_file = reader("LDAP_MAPPINGS_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            provision_server,
            target_category,
            detail_log,
            mappings_file,
        })
    }

    /// Load the mapping table named by `mappings_file`.
    ///
    /// Returns an empty catalog when no file is configured.
    pub fn load_catalog(&self) -> SyncResult<MappingCatalog> {
        match &self.mappings_file {
            Some(path) => MappingCatalog::from_path(path),
            None => Ok(MappingCatalog::new()),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::ffi::OsString;

    /// Create a reader closure from a HashMap (no global env mutation).
    fn make_reader(vars: HashMap<&str, &str>) -> impl Fn(&str) -> Result<String, VarError> {
        let owned: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| owned.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn test_defaults() {
        let config = SyncSettings::from_reader(make_reader(HashMap::new())).unwrap();
        assert_eq!(config, SyncSettings::default());
        assert!(config.provision_server.is_none());
        assert_eq!(config.target_category, AttributeCategory::Profile);
        assert!(!config.detail_log);
    }

    #[test]
    fn test_all_values() {
        let config = SyncSettings::from_reader(make_reader(HashMap::from([
            ("LDAP_PROVISION_SERVER", "corp_ad"),
            ("LDAP_PROFILE_TARGET_CATEGORY", "field"),
            ("LDAP_DETAIL_LOG", "true"),
            ("LDAP_MAPPINGS_FILE", "/etc/ldapsync/mappings.json"),
        ])))
        .unwrap();

        assert_eq!(config.provision_server, Some(ServerId::new("corp_ad")));
        assert_eq!(config.target_category, AttributeCategory::Field);
        assert!(config.detail_log);
        assert_eq!(
            config.mappings_file,
            Some(PathBuf::from("/etc/ldapsync/mappings.json"))
        );
    }

    #[test]
    fn test_blank_server_disables_sync() {
        let config = SyncSettings::from_reader(make_reader(HashMap::from([(
            "LDAP_PROVISION_SERVER",
            "  ",
        )])))
        .unwrap();
        assert!(config.provision_server.is_none());
    }

    #[test]
    fn test_invalid_detail_log() {
        let err = SyncSettings::from_reader(make_reader(HashMap::from([(
            "LDAP_DETAIL_LOG",
            "maybe",
        )])))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_, _)));
        assert!(err.to_string().contains("LDAP_DETAIL_LOG"));
    }

    #[test]
    fn test_non_unicode_detail_log_is_rejected() {
        let reader = |key: &str| -> Result<String, VarError> {
            match key {
                "LDAP_DETAIL_LOG" => Err(VarError::NotUnicode(OsString::from("on"))),
                _ => Err(VarError::NotPresent),
            }
        };
        let err = SyncSettings::from_reader(reader).unwrap_err();
        assert!(err.to_string().contains("LDAP_DETAIL_LOG"));
    }

    #[test]
    fn test_config_error_surfaces_as_sync_error() {
        fn bootstrap<F>(reader: F) -> SyncResult<MappingCatalog>
        where
            F: Fn(&str) -> Result<String, VarError>,
        {
            SyncSettings::from_reader(reader)?.load_catalog()
        }

        let err = bootstrap(make_reader(HashMap::from([("LDAP_DETAIL_LOG", "maybe")])))
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::SyncError::Configuration(ConfigError::InvalidValue(_, _))
        ));

        let catalog = bootstrap(make_reader(HashMap::new())).unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_builder() {
        let settings = SyncSettings::new("corp_ad")
            .with_target_category(AttributeCategory::Field)
            .with_detail_log(true);
        assert_eq!(settings.provision_server, Some(ServerId::new("corp_ad")));
        assert_eq!(settings.target_category, AttributeCategory::Field);
        assert!(settings.detail_log);
    }

    #[test]
    fn test_load_catalog_without_file() {
        let catalog = SyncSettings::default().load_catalog().unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_load_catalog_missing_file() {
        let settings = SyncSettings {
            mappings_file: Some(PathBuf::from("/nonexistent/ldapsync/mappings.json")),
            ..SyncSettings::default()
        };
        assert!(matches!(
            settings.load_catalog(),
            Err(crate::error::SyncError::Io(_))
        ));
    }
}
