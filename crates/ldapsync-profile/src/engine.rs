//! Profile sync engine.
//!
//! One `sync` call walks a single identity through:
//!
//! ```text
//! Start ──► DirectoryLookup ──► NotFound (terminal)
//!                 │
//!                 └──► Found ──► MappingIteration ──► Done
//! ```
//!
//! Writes are per record and immediate. Nothing is rolled back: a failed
//! save is reported and the engine moves on to the next record.

use chrono::{DateTime, Utc};
use ldapsync_directory::{DirectoryRecord, DirectoryResolver};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::config::SyncSettings;
use crate::diagnostic::{DiagnosticLog, TracingDiagnosticLog, PROFILE_CHANNEL, USER_CHANNEL};
use crate::error::{SyncError, SyncResult};
use crate::mapping::{AttributeMapping, MappingCatalog, SyncEvent};
use crate::store::{RecordStore, TargetRecord};
use crate::token::TokenResolver;
use crate::types::{Identity, SyncRunId};

const ENTRY_NOT_FOUND: &str =
    "@username: Failed to find associated LDAP entry for username in provision.";
const SAVE_FAILED: &str = "@username: Failed to save @record while applying @target: @error";

/// Why a sync stopped before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotFoundReason {
    /// No provisioning server is configured; nothing was looked up.
    NoProvisioningServer,
    /// The directory has no entry for the account.
    NoDirectoryEntry,
}

/// Why a mapping produced no writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Target category is not the one this engine writes to.
    CategoryMismatch,
    /// Target key has no field name.
    MissingFieldName,
    /// Source token resolved to nothing.
    NoValue,
    /// The identity owns no records in the category.
    NoTargetRecords,
    /// None of the owned records has the field.
    FieldNotPresent,
}

/// A mapping that was not applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedMapping {
    pub target_key: String,
    pub reason: SkipReason,
}

/// A record that could not be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistFailure {
    pub target_key: String,
    pub record_id: String,
    pub message: String,
}

/// Counters and details for one completed sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: SyncRunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Mappings with at least one successful write.
    pub mappings_applied: usize,
    /// Mappings that were inapplicable.
    pub mappings_skipped: usize,
    /// Mappings whose every attempted write failed.
    pub mappings_failed: usize,
    /// Successful record saves.
    pub records_written: usize,
    /// Failed record saves.
    pub records_failed: usize,
    pub skipped: Vec<SkippedMapping>,
    pub failures: Vec<PersistFailure>,
}

impl SyncReport {
    fn start(run_id: SyncRunId) -> Self {
        let now = Utc::now();
        Self {
            run_id,
            started_at: now,
            finished_at: now,
            mappings_applied: 0,
            mappings_skipped: 0,
            mappings_failed: 0,
            records_written: 0,
            records_failed: 0,
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn skip(&mut self, mapping: &AttributeMapping, reason: SkipReason) {
        debug!(target_key = %mapping.target_key, ?reason, "Mapping skipped");
        self.mappings_skipped += 1;
        self.skipped.push(SkippedMapping {
            target_key: mapping.target_key.clone(),
            reason,
        });
    }

    /// Check if any record failed to save.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.records_failed > 0
    }

    /// Total mappings considered.
    #[must_use]
    pub fn mappings_total(&self) -> usize {
        self.mappings_applied + self.mappings_skipped + self.mappings_failed
    }
}

/// Result of one sync invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Sync stopped before any mapping work.
    NotFound { reason: NotFoundReason },
    /// The directory entry was found and mappings were processed.
    Completed(SyncReport),
}

impl SyncOutcome {
    /// Get the report if the sync completed.
    #[must_use]
    pub fn report(&self) -> Option<&SyncReport> {
        match self {
            SyncOutcome::Completed(report) => Some(report),
            SyncOutcome::NotFound { .. } => None,
        }
    }

    /// Check if the sync stopped before mapping.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, SyncOutcome::NotFound { .. })
    }
}

/// Copies directory attributes into the records an identity owns.
pub struct ProfileSyncEngine<R: DirectoryResolver, S: RecordStore> {
    settings: SyncSettings,
    catalog: MappingCatalog,
    resolver: Arc<R>,
    store: Arc<S>,
    tokens: TokenResolver,
    diagnostics: Arc<dyn DiagnosticLog>,
}

impl<R: DirectoryResolver, S: RecordStore> ProfileSyncEngine<R, S> {
    /// Create an engine that logs diagnostics through `tracing`.
    pub fn new(
        settings: SyncSettings,
        catalog: MappingCatalog,
        resolver: Arc<R>,
        store: Arc<S>,
    ) -> Self {
        let diagnostics = Arc::new(TracingDiagnosticLog::new(settings.detail_log));
        Self {
            settings,
            catalog,
            resolver,
            store,
            tokens: TokenResolver::new(),
            diagnostics,
        }
    }

    /// Create an engine with the mapping table named by `settings`.
    pub fn from_settings(
        settings: SyncSettings,
        resolver: Arc<R>,
        store: Arc<S>,
    ) -> SyncResult<Self> {
        let catalog = settings.load_catalog()?;
        debug!(mappings = catalog.len(), "Mapping table loaded");
        Ok(Self::new(settings, catalog, resolver, store))
    }

    /// Create an engine from environment variables.
    pub fn from_env(resolver: Arc<R>, store: Arc<S>) -> SyncResult<Self> {
        Self::from_settings(SyncSettings::from_env()?, resolver, store)
    }

    /// Replace the diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticLog>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Engine settings.
    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// The mapping table.
    pub fn catalog(&self) -> &MappingCatalog {
        &self.catalog
    }

    /// Sync one identity from the provisioning server.
    ///
    /// Recognized conditions (no server configured, no directory entry,
    /// inapplicable mappings, failed saves) are reported in the outcome.
    /// Directory faults, store load faults and an unknown provisioning server
    /// are returned as errors.
    #[instrument(
        skip(self, identity),
        fields(account = %identity.account_name, owner_id = %identity.owner_id)
    )]
    pub async fn sync(&self, identity: &Identity) -> SyncResult<SyncOutcome> {
        let Some(server_id) = &self.settings.provision_server else {
            debug!("No provisioning server configured, skipping profile sync");
            return Ok(SyncOutcome::NotFound {
                reason: NotFoundReason::NoProvisioningServer,
            });
        };

        let client = self
            .resolver
            .resolve(server_id)
            .await?
            .ok_or_else(|| SyncError::server_not_found(server_id.clone()))?;

        let Some(record) = client
            .get_record_by_identifier(&identity.account_name)
            .await?
        else {
            info!(server_id = %server_id, "No directory entry for account");
            self.diagnostics.log(
                ENTRY_NOT_FOUND,
                &[("@username", identity.account_name.as_str())],
                USER_CHANNEL,
            );
            return Ok(SyncOutcome::NotFound {
                reason: NotFoundReason::NoDirectoryEntry,
            });
        };

        let mut report = SyncReport::start(SyncRunId::new());
        debug!(run_id = %report.run_id, dn = %record.dn(), "Directory entry found");

        for mapping in self.catalog.mappings_for(SyncEvent::SyncToLocalAccount) {
            self.apply_mapping(identity, &record, mapping, &mut report)
                .await?;
        }

        report.finished_at = Utc::now();
        info!(
            run_id = %report.run_id,
            applied = report.mappings_applied,
            skipped = report.mappings_skipped,
            failed = report.mappings_failed,
            records_written = report.records_written,
            "Profile sync completed"
        );

        Ok(SyncOutcome::Completed(report))
    }

    async fn apply_mapping(
        &self,
        identity: &Identity,
        record: &DirectoryRecord,
        mapping: &AttributeMapping,
        report: &mut SyncReport,
    ) -> SyncResult<()> {
        let value = self.tokens.resolve(record, &mapping.source_token);
        let target = mapping.target();

        if target.category != self.settings.target_category {
            report.skip(mapping, SkipReason::CategoryMismatch);
            return Ok(());
        }
        let Some(field_name) = target.field_name() else {
            report.skip(mapping, SkipReason::MissingFieldName);
            return Ok(());
        };
        let Some(value) = value else {
            report.skip(mapping, SkipReason::NoValue);
            return Ok(());
        };

        let mut records = self
            .store
            .load_owned_records(&target.category, &identity.owner_id)
            .await?;
        if records.is_empty() {
            report.skip(mapping, SkipReason::NoTargetRecords);
            return Ok(());
        }

        let mut attempted = 0usize;
        let mut written = 0usize;
        for target_record in records.iter_mut() {
            if !target_record.has_field(field_name) {
                continue;
            }
            attempted += 1;
            target_record.set_field(field_name, value.clone());

            match self.store.save(target_record).await {
                Ok(()) => {
                    written += 1;
                    report.records_written += 1;
                    debug!(
                        record_id = %target_record.record_id(),
                        field = %field_name,
                        "Target record updated"
                    );
                }
                Err(e) => {
                    let record_id = target_record.record_id();
                    let message = e.to_string();
                    warn!(
                        record_id = %record_id,
                        target_key = %mapping.target_key,
                        error = %message,
                        "Failed to save target record"
                    );
                    self.diagnostics.log(
                        SAVE_FAILED,
                        &[
                            ("@username", identity.account_name.as_str()),
                            ("@record", record_id.as_str()),
                            ("@target", mapping.target_key.as_str()),
                            ("@error", message.as_str()),
                        ],
                        PROFILE_CHANNEL,
                    );
                    report.records_failed += 1;
                    report.failures.push(PersistFailure {
                        target_key: mapping.target_key.clone(),
                        record_id,
                        message,
                    });
                }
            }
        }

        if attempted == 0 {
            report.skip(mapping, SkipReason::FieldNotPresent);
        } else if written > 0 {
            report.mappings_applied += 1;
        } else {
            report.mappings_failed += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization() {
        let outcome = SyncOutcome::NotFound {
            reason: NotFoundReason::NoDirectoryEntry,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": "not_found", "reason": "no_directory_entry"})
        );
        assert!(outcome.is_not_found());
        assert!(outcome.report().is_none());
    }

    #[test]
    fn test_report_counters() {
        let mut report = SyncReport::start(SyncRunId::new());
        report.skip(
            &AttributeMapping::on_login("field.x", "cn"),
            SkipReason::CategoryMismatch,
        );
        report.mappings_applied += 2;

        assert_eq!(report.mappings_total(), 3);
        assert!(!report.has_failures());
        assert_eq!(report.skipped[0].reason, SkipReason::CategoryMismatch);

        let json = serde_json::to_value(&report.skipped[0]).unwrap();
        assert_eq!(json["reason"], "category_mismatch");
    }
}
