//! Attribute extraction from directory entries.
//!
//! Pure lookup: no policy lives here. A missing attribute is `Ok(None)`; only a
//! failing underlying read surfaces as an error.

use std::collections::HashMap;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure while reading attribute values from the directory.
#[derive(Debug, Error)]
pub enum AttributeReadError {
    #[error("failed to read attribute '{name}': {source}")]
    Io {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// A set of raw attribute values attached to a directory entry.
///
/// Implemented by transports that read lazily from the wire; [`Attributes`] is
/// the in-memory implementation.
pub trait AttributeSource {
    /// Return the first value of `name`, or `None` when absent.
    fn read(&self, name: &str) -> io::Result<Option<String>>;
}

/// Look up a single, optionally-present string value.
///
/// Returns `Ok(None)` when `name` is unset/blank or the attribute is absent.
pub fn extract<A>(attrs: &A, name: Option<&str>) -> Result<Option<String>, AttributeReadError>
where
    A: AttributeSource + ?Sized,
{
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Ok(None);
    };

    attrs.read(name).map_err(|source| AttributeReadError::Io {
        name: name.to_string(),
        source,
    })
}

/// In-memory multi-valued attribute set.
///
/// Attribute names are matched case-insensitively, as directories do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, AttributeValues>", into = "HashMap<String, Vec<String>>")]
pub struct Attributes {
    values: HashMap<String, Vec<String>>,
}

/// Raw attribute value as found in a serialized entry: one string or a list.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AttributeValues {
    One(String),
    Many(Vec<String>),
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style single-value insert.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Append a value to `name`.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
    }

    pub fn get_all(&self, name: &str) -> &[String] {
        self.values
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        !self.get_all(name).is_empty()
    }
}

impl AttributeSource for Attributes {
    fn read(&self, name: &str) -> io::Result<Option<String>> {
        Ok(self.get_all(name).first().cloned())
    }
}

impl From<HashMap<String, AttributeValues>> for Attributes {
    fn from(raw: HashMap<String, AttributeValues>) -> Self {
        let mut attrs = Attributes::new();
        for (name, values) in raw {
            match values {
                AttributeValues::One(v) => attrs.insert(&name, v),
                AttributeValues::Many(vs) => {
                    for v in vs {
                        attrs.insert(&name, v);
                    }
                }
            }
        }
        attrs
    }
}

impl From<Attributes> for HashMap<String, Vec<String>> {
    fn from(attrs: Attributes) -> Self {
        attrs.values
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name, value);
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenSource;

    impl AttributeSource for BrokenSource {
        fn read(&self, _name: &str) -> io::Result<Option<String>> {
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"))
        }
    }

    #[test]
    fn extract_returns_first_value() {
        let attrs = Attributes::new()
            .with("mail", "alice@example.org")
            .with("mail", "a.smith@example.org");

        let value = extract(&attrs, Some("mail")).unwrap();
        assert_eq!(value.as_deref(), Some("alice@example.org"));
    }

    #[test]
    fn extract_is_case_insensitive() {
        let attrs = Attributes::new().with("userAccountControl", "512");
        let value = extract(&attrs, Some("USERACCOUNTCONTROL")).unwrap();
        assert_eq!(value.as_deref(), Some("512"));
    }

    #[test]
    fn extract_missing_or_unnamed_is_none() {
        let attrs = Attributes::new().with("cn", "alice");
        assert!(extract(&attrs, Some("sn")).unwrap().is_none());
        assert!(extract(&attrs, Some("")).unwrap().is_none());
        assert!(extract(&attrs, None).unwrap().is_none());
    }

    #[test]
    fn unnamed_lookup_never_touches_the_source() {
        assert!(extract(&BrokenSource, None).unwrap().is_none());
    }

    #[test]
    fn failing_read_propagates_io_error() {
        let err = extract(&BrokenSource, Some("pwdLastSet")).unwrap_err();
        let AttributeReadError::Io { name, source } = err;
        assert_eq!(name, "pwdLastSet");
        assert_eq!(source.kind(), io::ErrorKind::ConnectionReset);
    }

    #[test]
    fn deserializes_single_and_multi_values() {
        let attrs: Attributes =
            serde_json::from_str(r#"{"cn": "alice", "objectClass": ["top", "person"]}"#).unwrap();
        assert_eq!(attrs.get_all("objectclass"), ["top", "person"]);
        assert_eq!(attrs.get_all("CN"), ["alice"]);
    }
}
