//! Directory identity.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Identity of an authenticated directory entry.
///
/// Usually a distinguished name (`uid=alice,ou=people,dc=example,dc=org`), but
/// kept opaque at this layer: the transport decides what the resolved name is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(Cow<'static, str>);

impl Identity {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Identity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identity {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for Identity {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}
