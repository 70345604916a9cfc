//! Directory error classification.
//!
//! Bind failures come back from the transport as free text (for Active
//! Directory, something like `LDAP: error code 49 - 80090308: LdapErr:
//! DSID-0C0903A9, comment: AcceptSecurityContext error, data 775, v1db1`).
//! Configured definitions translate that text into a typed rejection; the
//! raw text itself is never handed to the caller.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use pwpolicy_core::ConfigError;

use crate::{ErrorType, Rejection};

/// Pattern over a raw directory error message mapped to a classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ErrorDefinitionSpec", into = "ErrorDefinitionSpec")]
pub struct ErrorDefinition {
    pattern: Regex,
    error_type: ErrorType,
    message: Option<String>,
}

/// Serialized form of [`ErrorDefinition`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDefinitionSpec {
    pub pattern: String,
    #[serde(rename = "type")]
    pub error_type: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorDefinition {
    pub fn new(pattern: &str, error_type: ErrorType) -> Result<Self, ConfigError> {
        let pattern =
            Regex::new(pattern).map_err(|e| ConfigError::invalid_pattern(pattern, e.to_string()))?;
        Ok(Self {
            pattern,
            error_type,
            message: None,
        })
    }

    /// Human-readable text shown instead of the raw directory message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.error_type
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether the pattern occurs anywhere in `raw`.
    pub fn matches(&self, raw: &str) -> bool {
        self.pattern.is_match(raw)
    }

    /// Standard Active Directory bind sub-codes (`data NNN`).
    pub fn active_directory_defaults() -> Vec<ErrorDefinition> {
        const TABLE: [(&str, ErrorType, &str); 9] = [
            ("data 525", ErrorType::BAD_CREDENTIALS, "Invalid username or password."),
            ("data 52e", ErrorType::BAD_CREDENTIALS, "Invalid username or password."),
            ("data 530", ErrorType::INVALID_LOGON_HOURS, "Logon is not permitted at this time."),
            ("data 531", ErrorType::INVALID_WORKSTATION, "Logon is not permitted from this workstation."),
            ("data 532", ErrorType::ACCOUNT_PASSWORD_EXPIRED, "Your password has expired."),
            ("data 533", ErrorType::ACCOUNT_DISABLED, "Your account is disabled."),
            ("data 701", ErrorType::ACCOUNT_DISABLED, "Your account has expired."),
            ("data 773", ErrorType::ACCOUNT_MUST_CHANGE_PASSWORD, "You must change your password."),
            ("data 775", ErrorType::ACCOUNT_LOCKED, "Your account is locked."),
        ];

        TABLE
            .into_iter()
            .filter_map(|(pattern, error_type, message)| {
                ErrorDefinition::new(pattern, error_type)
                    .ok()
                    .map(|def| def.with_message(message))
            })
            .collect()
    }
}

impl PartialEq for ErrorDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.pattern.as_str() == other.pattern.as_str()
            && self.error_type == other.error_type
            && self.message == other.message
    }
}

impl Eq for ErrorDefinition {}

impl TryFrom<ErrorDefinitionSpec> for ErrorDefinition {
    type Error = ConfigError;

    fn try_from(spec: ErrorDefinitionSpec) -> Result<Self, Self::Error> {
        let def = ErrorDefinition::new(&spec.pattern, spec.error_type)?;
        Ok(match spec.message {
            Some(m) => def.with_message(m),
            None => def,
        })
    }
}

impl From<ErrorDefinition> for ErrorDefinitionSpec {
    fn from(def: ErrorDefinition) -> Self {
        ErrorDefinitionSpec {
            pattern: def.pattern.as_str().to_string(),
            error_type: def.error_type,
            message: def.message,
        }
    }
}

/// Translate a raw directory error message into a rejection.
///
/// Definitions are tried in declaration order; the first match wins. No match
/// (or no definitions) yields [`ErrorType::BAD_CREDENTIALS`].
pub fn classify_error(definitions: &[ErrorDefinition], raw: &str) -> Rejection {
    if definitions.is_empty() {
        debug!(error = raw, "no error definitions configured");
        return Rejection::bad_credentials();
    }

    match definitions.iter().find(|def| def.matches(raw)) {
        Some(def) => {
            debug!(error = raw, pattern = def.pattern(), error_type = %def.error_type, "matched error definition");
            let message = def
                .message
                .clone()
                .unwrap_or_else(|| format!("Authentication failed ({}).", def.error_type));
            Rejection::new(def.error_type.clone(), message).with_rule(def.pattern())
        }
        None => {
            debug!(error = raw, "no error definition matched");
            Rejection::bad_credentials()
        }
    }
}
