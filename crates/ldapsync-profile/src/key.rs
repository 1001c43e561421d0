//! Target attribute keys.
//!
//! Mapping targets are written as `<category>.<name>[:<instance>]`, for
//! example `field.lname`, `property.mail` or `[field.aliases:2]`.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Category of a target attribute key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttributeCategory {
    /// A configurable field on the local record (`field.*`).
    Field,
    /// A base property of the local account (`property.*`).
    Property,
    /// A field on a profile record owned by the account (`profile.*`).
    #[default]
    Profile,
    /// Any other category; never applied by the profile engine unless configured.
    Other(String),
}

impl AttributeCategory {
    /// Map a raw category segment to a category.
    pub fn from_name(name: &str) -> Self {
        match name {
            "field" => AttributeCategory::Field,
            "property" => AttributeCategory::Property,
            "profile" => AttributeCategory::Profile,
            other => AttributeCategory::Other(other.to_string()),
        }
    }

    /// Get the key segment for this category.
    pub fn as_str(&self) -> &str {
        match self {
            AttributeCategory::Field => "field",
            AttributeCategory::Property => "property",
            AttributeCategory::Profile => "profile",
            AttributeCategory::Other(name) => name,
        }
    }
}

impl fmt::Display for AttributeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeCategory {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_name(s))
    }
}

impl From<String> for AttributeCategory {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl From<AttributeCategory> for String {
    fn from(category: AttributeCategory) -> Self {
        category.as_str().to_string()
    }
}

/// Parsed form of a mapping's target key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetReference {
    /// Category segment (before the first `.`).
    pub category: AttributeCategory,
    /// Field name, without any instance suffix. `None` when the key has no name.
    pub name: Option<String>,
    /// Numeric instance suffix (`:N`). Informational only: it never selects
    /// among multiple values.
    pub instance: Option<u32>,
}

impl TargetReference {
    /// Parse a target key. Never fails; malformed keys yield an absent name.
    pub fn parse(key: &str) -> Self {
        let key = key.trim_matches(|c| c == '[' || c == ']');
        let mut parts = key.split('.');

        let category = AttributeCategory::from_name(parts.next().unwrap_or_default());

        let (name, instance) = match parts.next() {
            Some(raw) => match raw.split_once(':') {
                Some((name, suffix)) => (name, suffix.parse::<u32>().ok()),
                None => (raw, None),
            },
            None => ("", None),
        };

        Self {
            category,
            name: (!name.is_empty()).then(|| name.to_string()),
            instance,
        }
    }

    /// The field name, if present.
    pub fn field_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if this reference targets `category` and names a field.
    pub fn applies_to(&self, category: &AttributeCategory) -> bool {
        &self.category == category && self.name.is_some()
    }
}

impl FromStr for TargetReference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for TargetReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)?;
        if let Some(name) = &self.name {
            write!(f, ".{name}")?;
        }
        if let Some(instance) = self.instance {
            write!(f, ":{instance}")?;
        }
        Ok(())
    }
}

/// Split a target key into its category and field name.
pub fn parse_attribute_key(key: &str) -> (String, Option<String>) {
    let reference = TargetReference::parse(key);
    (reference.category.as_str().to_string(), reference.name)
}
