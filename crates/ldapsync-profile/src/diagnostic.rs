//! Diagnostic notices for sync anomalies.
//!
//! Notices are templated messages with `@name` placeholders plus a channel,
//! so they can be rendered for operators or inspected structurally. Logging
//! a notice never fails and never changes the caller's control flow.

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::{info, warn};

/// Channel for notices about directory lookups.
pub const USER_CHANNEL: &str = "ldap-user";

/// Channel for notices about profile writes.
pub const PROFILE_CHANNEL: &str = "ldap-profile";

/// One logged notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    /// Message template with `@name` placeholders.
    pub template: String,
    /// Placeholder values, keyed with their sigil (`@username`).
    pub params: Vec<(String, String)>,
    /// Log channel.
    pub channel: String,
    /// When the notice was logged.
    pub logged_at: DateTime<Utc>,
}

impl DiagnosticEntry {
    /// Create an entry stamped with the current time.
    pub fn new(template: &str, params: &[(&str, &str)], channel: &str) -> Self {
        Self {
            template: template.to_string(),
            params: params
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            channel: channel.to_string(),
            logged_at: Utc::now(),
        }
    }

    /// Render the template with its parameters substituted.
    pub fn render(&self) -> String {
        render_template(&self.template, &self.params)
    }
}

/// Substitute `params` into `template` in a single pass.
///
/// Only placeholders in the template text are replaced; substituted values
/// are never scanned again. Longer keys win, so `@user` never matches the
/// front of `@username`.
pub fn render_template(template: &str, params: &[(String, String)]) -> String {
    let mut ordered: Vec<&(String, String)> =
        params.iter().filter(|(key, _)| !key.is_empty()).collect();
    if ordered.is_empty() {
        return template.to_string();
    }
    ordered.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let pattern = ordered
        .iter()
        .map(|(key, _)| regex::escape(key))
        .collect::<Vec<_>>()
        .join("|");
    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!(error = %e, "Could not build diagnostic placeholder pattern");
            return template.to_string();
        }
    };

    re.replace_all(template, |caps: &Captures<'_>| {
        let matched = &caps[0];
        ordered
            .iter()
            .find(|(key, _)| key.as_str() == matched)
            .map(|(_, value)| value.clone())
            .unwrap_or_default()
    })
    .into_owned()
}

/// Sink for diagnostic notices.
pub trait DiagnosticLog: Send + Sync {
    /// Record a notice.
    fn log(&self, template: &str, params: &[(&str, &str)], channel: &str);
}

/// Emits notices through `tracing` when detail logging is enabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnosticLog {
    detail: bool,
}

impl TracingDiagnosticLog {
    /// Create a log; notices are dropped unless `detail` is set.
    #[must_use]
    pub fn new(detail: bool) -> Self {
        Self { detail }
    }

    /// Check if notices are emitted.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.detail
    }
}

impl DiagnosticLog for TracingDiagnosticLog {
    fn log(&self, template: &str, params: &[(&str, &str)], channel: &str) {
        if !self.detail {
            return;
        }
        let entry = DiagnosticEntry::new(template, params, channel);
        info!(channel = %entry.channel, "{}", entry.render());
    }
}

/// Keeps notices in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryDiagnosticLog {
    entries: Mutex<Vec<DiagnosticEntry>>,
}

impl MemoryDiagnosticLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries.
    pub fn entries(&self) -> Vec<DiagnosticEntry> {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Check if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticLog for MemoryDiagnosticLog {
    fn log(&self, template: &str, params: &[(&str, &str)], channel: &str) {
        let entry = DiagnosticEntry::new(template, params, channel);
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(entry);
    }
}
