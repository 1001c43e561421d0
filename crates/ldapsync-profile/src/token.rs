//! Source token resolution.
//!
//! A mapping's source token is either a bare attribute name (`mail`) or a
//! template with bracketed placeholders (`[givenName] [sn]`). Placeholders
//! take the form `[attr(:ordinal)?(;conversion)?]`:
//!
//! - `ordinal` selects a value of a multi-valued attribute: a zero-based
//!   index or `last`. Defaults to the first value.
//! - `conversion` re-encodes the raw value: `base64_encode`, `bin2hex`,
//!   `msguid` or `binary`.
//!
//! Resolution is pure. Missing attributes never fault: a bare token resolves
//! to nothing and a template placeholder to an empty segment.

use base64::Engine as _;
use ldapsync_directory::DirectoryRecord;
use regex::{Captures, Regex};
use std::sync::LazyLock;
use tracing::debug;
use uuid::Uuid;

use crate::types::FieldValue;

static PLACEHOLDER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\[\]:;]+)(?::([^\[\];]+))?(?:;([^\[\]]+))?\]")
        .expect("PLACEHOLDER_RE is a valid regex pattern")
});

/// Encoding applied to a raw value inside a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    /// Standard base64.
    Base64Encode,
    /// Lowercase hex.
    Bin2Hex,
    /// Active Directory `objectGUID` rendered as a hyphenated GUID.
    MsGuid,
    /// Backslash-escaped hex (`\ab\cd`), as used in LDAP search filters.
    Binary,
}

impl Conversion {
    /// Look up a conversion by its placeholder name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim() {
            "base64_encode" => Some(Conversion::Base64Encode),
            "bin2hex" => Some(Conversion::Bin2Hex),
            "msguid" => Some(Conversion::MsGuid),
            "binary" => Some(Conversion::Binary),
            _ => None,
        }
    }

    /// Apply the conversion to a raw value.
    pub fn apply(&self, raw: &[u8]) -> String {
        match self {
            Conversion::Base64Encode => base64::engine::general_purpose::STANDARD.encode(raw),
            Conversion::Bin2Hex => hex::encode(raw),
            Conversion::MsGuid => match Uuid::from_slice_le(raw) {
                Ok(guid) => guid.hyphenated().to_string(),
                Err(_) => hex::encode(raw),
            },
            Conversion::Binary => raw.iter().map(|b| format!("\\{b:02x}")).collect(),
        }
    }
}

/// Which value of a multi-valued attribute a placeholder selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ordinal {
    Index(usize),
    Last,
}

impl Ordinal {
    fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None => Some(Ordinal::Index(0)),
            Some("last") => Some(Ordinal::Last),
            Some(n) => n.parse().ok().map(Ordinal::Index),
        }
    }

    fn select<'a>(&self, values: &[&'a [u8]]) -> Option<&'a [u8]> {
        match self {
            Ordinal::Index(i) => values.get(*i).copied(),
            Ordinal::Last => values.last().copied(),
        }
    }
}

/// Resolves source tokens against directory records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenResolver;

impl TokenResolver {
    /// Create a new resolver.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Resolve a source token against a record.
    ///
    /// Bare tokens return the attribute's values verbatim (single or
    /// multiple) or `None` when the attribute is missing. Templates always
    /// compose to a single string.
    pub fn resolve(&self, record: &DirectoryRecord, token: &str) -> Option<FieldValue> {
        if Self::is_template(token) {
            let rendered = self.render_template(record, token);
            if rendered.is_empty() {
                debug!(
                    dn = %record.dn(),
                    attributes = ?Self::referenced_attributes(token),
                    "Template composed to an empty value"
                );
            }
            return Some(FieldValue::Single(rendered));
        }

        let name = token.trim();
        if name.is_empty() {
            return None;
        }
        record.strings(name).and_then(FieldValue::from_values)
    }

    /// Check if a token contains placeholders.
    pub fn is_template(token: &str) -> bool {
        PLACEHOLDER_RE.is_match(token)
    }

    /// Attribute names referenced by a template, in order of appearance.
    pub fn referenced_attributes(token: &str) -> Vec<String> {
        if !Self::is_template(token) {
            let name = token.trim();
            return if name.is_empty() {
                Vec::new()
            } else {
                vec![name.to_string()]
            };
        }

        let mut names: Vec<String> = Vec::new();
        for caps in PLACEHOLDER_RE.captures_iter(token) {
            let name = caps[1].trim().to_string();
            if !names.iter().any(|n| n.eq_ignore_ascii_case(&name)) {
                names.push(name);
            }
        }
        names
    }

    /// Substitute every placeholder in `template` with its value.
    pub fn render_template(&self, record: &DirectoryRecord, template: &str) -> String {
        PLACEHOLDER_RE
            .replace_all(template, |caps: &Captures<'_>| {
                self.placeholder_value(record, caps)
            })
            .into_owned()
    }

    fn placeholder_value(&self, record: &DirectoryRecord, caps: &Captures<'_>) -> String {
        let name = caps[1].trim();

        let Some(ordinal) = Ordinal::parse(caps.get(2).map(|m| m.as_str())) else {
            debug!(attribute = %name, placeholder = &caps[0], "Unrecognized ordinal in placeholder");
            return String::new();
        };

        let Some(values) = record.values(name) else {
            return String::new();
        };
        let Some(raw) = ordinal.select(&values) else {
            return String::new();
        };

        match caps.get(3).map(|m| m.as_str()) {
            None => String::from_utf8_lossy(raw).into_owned(),
            Some(conversion_name) => match Conversion::from_name(conversion_name) {
                Some(conversion) => conversion.apply(raw),
                None => {
                    debug!(
                        attribute = %name,
                        conversion = %conversion_name,
                        "Unknown conversion, using raw value"
                    );
                    String::from_utf8_lossy(raw).into_owned()
                }
            },
        }
    }
}
