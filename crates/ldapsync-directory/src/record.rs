//! Directory record types
//!
//! A read-only snapshot of one directory entry: its distinguished name and
//! its attributes. Attribute names are case-insensitive, as in LDAP, and
//! every attribute may carry several values.

use std::collections::HashMap;

/// Name of the pseudo-attribute that resolves to the entry's DN.
pub const DN_ATTRIBUTE: &str = "dn";

/// A single attribute on a directory entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryAttribute {
    /// Attribute name as returned by the server (original casing).
    name: String,
    /// Raw values. LDAP values may be binary (e.g. `objectGUID`).
    values: Vec<Vec<u8>>,
}

impl DirectoryAttribute {
    /// Get the attribute name with its original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the raw values.
    pub fn values(&self) -> &[Vec<u8>] {
        &self.values
    }

    /// Get the values as strings (lossy UTF-8).
    pub fn strings(&self) -> Vec<String> {
        self.values
            .iter()
            .map(|v| String::from_utf8_lossy(v).into_owned())
            .collect()
    }
}

/// A directory entry fetched for one identity.
///
/// Records are built by a [`DirectoryClient`](crate::traits::DirectoryClient)
/// and never mutated by the sync engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryRecord {
    dn: String,
    /// Keyed by lowercased attribute name.
    attributes: HashMap<String, DirectoryAttribute>,
}

impl DirectoryRecord {
    /// Create an empty record for the given distinguished name.
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            attributes: HashMap::new(),
        }
    }

    /// Append a value to an attribute, creating the attribute if needed.
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        let name = name.into();
        self.attributes
            .entry(name.to_lowercase())
            .or_insert_with(|| DirectoryAttribute {
                name,
                values: Vec::new(),
            })
            .values
            .push(value.into());
    }

    /// Add a value using builder pattern.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        self.add_value(name, value);
        self
    }

    /// Add several values for one attribute using builder pattern.
    #[must_use]
    pub fn with_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Vec<u8>>,
    {
        let name = name.into();
        for value in values {
            self.add_value(name.clone(), value);
        }
        self
    }

    /// Get the distinguished name of the entry.
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Look up an attribute, ignoring case.
    pub fn attribute(&self, name: &str) -> Option<&DirectoryAttribute> {
        self.attributes.get(&name.to_lowercase())
    }

    /// Get the raw values of an attribute.
    ///
    /// `dn` resolves to the entry's distinguished name unless the server
    /// returned a real attribute of that name.
    pub fn values(&self, name: &str) -> Option<Vec<&[u8]>> {
        if let Some(attr) = self.attribute(name) {
            return Some(attr.values.iter().map(Vec::as_slice).collect());
        }
        if name.eq_ignore_ascii_case(DN_ATTRIBUTE) && !self.dn.is_empty() {
            return Some(vec![self.dn.as_bytes()]);
        }
        None
    }

    /// Get the values of an attribute as strings (lossy UTF-8).
    pub fn strings(&self, name: &str) -> Option<Vec<String>> {
        self.values(name).map(|values| {
            values
                .into_iter()
                .map(|v| String::from_utf8_lossy(v).into_owned())
                .collect()
        })
    }

    /// Get the first value of an attribute as a string.
    pub fn first_string(&self, name: &str) -> Option<String> {
        self.strings(name).and_then(|values| values.into_iter().next())
    }

    /// Check if an attribute is present.
    pub fn has(&self, name: &str) -> bool {
        self.values(name).is_some()
    }

    /// Iterate over attribute names (original casing).
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.values().map(|a| a.name.as_str())
    }

    /// Number of attributes, not counting the DN.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the record has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jane() -> DirectoryRecord {
        DirectoryRecord::new("cn=Jane Doe,ou=people,dc=example,dc=com")
            .with("displayName", "Jane Doe")
            .with("mail", "jane@example.com")
            .with_values("memberOf", ["cn=staff", "cn=admins"])
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let record = jane();
        assert_eq!(record.first_string("displayname").as_deref(), Some("Jane Doe"));
        assert_eq!(record.first_string("DISPLAYNAME").as_deref(), Some("Jane Doe"));
        assert_eq!(record.attribute("MAIL").unwrap().name(), "mail");
    }

    #[test]
    fn test_multi_valued_attribute() {
        let record = jane();
        assert_eq!(
            record.strings("memberof").unwrap(),
            vec!["cn=staff".to_string(), "cn=admins".to_string()]
        );
    }

    #[test]
    fn test_mixed_case_values_merge() {
        let record = DirectoryRecord::new("uid=a")
            .with("Mail", "a@example.com")
            .with("mail", "b@example.com");
        assert_eq!(record.len(), 1);
        assert_eq!(record.strings("MAIL").unwrap().len(), 2);
        assert_eq!(record.attribute("mail").unwrap().name(), "Mail");
    }

    #[test]
    fn test_dn_pseudo_attribute() {
        let record = jane();
        assert_eq!(
            record.first_string("dn").as_deref(),
            Some("cn=Jane Doe,ou=people,dc=example,dc=com")
        );
        assert!(record.has("DN"));

        let anonymous = DirectoryRecord::default();
        assert!(!anonymous.has("dn"));
    }

    #[test]
    fn test_missing_attribute() {
        let record = jane();
        assert!(record.values("telephoneNumber").is_none());
        assert!(!record.has("telephoneNumber"));
    }

    #[test]
    fn test_binary_values_are_preserved() {
        let guid = vec![0x01u8, 0xff, 0x00, 0x80];
        let record = DirectoryRecord::new("cn=x").with("objectGUID", guid.clone());
        assert_eq!(record.values("objectguid").unwrap(), vec![guid.as_slice()]);
    }
}
