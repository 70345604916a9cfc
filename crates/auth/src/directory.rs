//! Directory transport boundary.
//!
//! The bind/search itself is external: this module only defines what the
//! policy handler needs from it, plus an in-memory directory for tests and
//! offline evaluation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use pwpolicy_core::Identity;

use crate::attributes::{AttributeSource, Attributes};

/// Username/password pair presented at login.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// The entry resolved by a successful bind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry<A = Attributes> {
    pub name: Identity,
    pub attributes: A,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindOutcome<A> {
    /// The directory refused the credentials without raising an error.
    Rejected,
    /// Bound; the entry is `None` when the transport could not resolve it.
    Authenticated(Option<DirectoryEntry<A>>),
}

/// Failure raised by the transport during bind or search.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("{0}")]
    Transport(String),
}

impl DirectoryError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn message(&self) -> &str {
        match self {
            DirectoryError::Transport(msg) => msg,
        }
    }
}

/// A directory that can bind a user and return the user's attributes.
pub trait DirectoryAuthenticator {
    type Attributes: AttributeSource;

    /// Name used in logs.
    fn name(&self) -> &str;

    /// Attributes requested from the directory on bind.
    fn attributes_to_return(&self) -> &[String];

    fn set_attributes_to_return(&mut self, attributes: Vec<String>);

    /// Single synchronous request/response; no retries.
    fn bind(&self, credentials: &Credentials) -> Result<BindOutcome<Self::Attributes>, DirectoryError>;
}

/// A scripted account in [`InMemoryDirectory`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryAccount {
    pub password: String,
    /// Resolved entry; `None` simulates a bind that cannot locate the entry.
    #[serde(default)]
    pub entry: Option<DirectoryEntry>,
    /// When set, binding this account fails with this transport message.
    #[serde(default)]
    pub bind_error: Option<String>,
}

/// In-memory directory keyed by username.
///
/// Only attributes listed in `attributes_to_return` are handed back, the way a
/// real search would filter them.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDirectory {
    accounts: HashMap<String, DirectoryAccount>,
    attributes_to_return: Vec<String>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, username: impl Into<String>, account: DirectoryAccount) -> Self {
        self.accounts.insert(username.into(), account);
        self
    }

    pub fn with_attributes_to_return<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_return = names.into_iter().map(Into::into).collect();
        self
    }

    fn project(&self, entry: &DirectoryEntry) -> DirectoryEntry {
        let mut attributes = Attributes::new();
        for name in &self.attributes_to_return {
            for value in entry.attributes.get_all(name) {
                attributes.insert(name, value.clone());
            }
        }
        DirectoryEntry {
            name: entry.name.clone(),
            attributes,
        }
    }
}

impl DirectoryAuthenticator for InMemoryDirectory {
    type Attributes = Attributes;

    fn name(&self) -> &str {
        "in-memory"
    }

    fn attributes_to_return(&self) -> &[String] {
        &self.attributes_to_return
    }

    fn set_attributes_to_return(&mut self, attributes: Vec<String>) {
        self.attributes_to_return = attributes;
    }

    fn bind(&self, credentials: &Credentials) -> Result<BindOutcome<Attributes>, DirectoryError> {
        let Some(account) = self.accounts.get(&credentials.username) else {
            return Ok(BindOutcome::Rejected);
        };
        if let Some(msg) = &account.bind_error {
            return Err(DirectoryError::transport(msg.clone()));
        }
        if account.password != credentials.password() {
            return Ok(BindOutcome::Rejected);
        }
        Ok(BindOutcome::Authenticated(
            account.entry.as_ref().map(|e| self.project(e)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> InMemoryDirectory {
        InMemoryDirectory::new()
            .with_attributes_to_return(["cn"])
            .with_account(
                "alice",
                DirectoryAccount {
                    password: "s3cret".into(),
                    entry: Some(DirectoryEntry {
                        name: Identity::new("uid=alice,dc=example,dc=org"),
                        attributes: Attributes::new().with("cn", "Alice").with("pwdLastSet", "1"),
                    }),
                    bind_error: None,
                },
            )
    }

    #[test]
    fn wrong_password_is_rejected() {
        let outcome = directory().bind(&Credentials::new("alice", "nope")).unwrap();
        assert_eq!(outcome, BindOutcome::Rejected);
    }

    #[test]
    fn unknown_user_is_rejected() {
        let outcome = directory().bind(&Credentials::new("mallory", "x")).unwrap();
        assert_eq!(outcome, BindOutcome::Rejected);
    }

    #[test]
    fn only_requested_attributes_are_returned() {
        let BindOutcome::Authenticated(Some(entry)) =
            directory().bind(&Credentials::new("alice", "s3cret")).unwrap()
        else {
            panic!("expected an authenticated entry");
        };
        assert!(entry.attributes.contains("cn"));
        assert!(!entry.attributes.contains("pwdLastSet"));
    }

    #[test]
    fn debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("alice", "s3cret"));
        assert!(!rendered.contains("s3cret"));
    }
}
