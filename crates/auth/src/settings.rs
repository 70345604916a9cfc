//! Startup configuration for password policy evaluation.
//!
//! Built once, then only read. Every field has a default so a settings
//! document only needs to name what it changes.

use serde::{Deserialize, Serialize};

use pwpolicy_core::{ConfigError, ConfigResult, ValueObject};

use crate::ErrorDefinition;

/// Names of the directory attributes that carry policy data.
///
/// `None` (or blank) disables the corresponding check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyAttributes {
    /// Expiration date, or last password change date (e.g. `pwdLastSet`).
    pub password_expiration_date: Option<String>,
    pub password_warning_days: Option<String>,
    pub valid_password_days: Option<String>,
    pub ignore_expiration_warning: Option<String>,
    pub account_disabled: Option<String>,
    pub account_locked: Option<String>,
    pub password_must_change: Option<String>,
    pub user_account_control: Option<String>,
}

impl Default for PolicyAttributes {
    fn default() -> Self {
        Self {
            password_expiration_date: None,
            password_warning_days: None,
            valid_password_days: None,
            ignore_expiration_warning: None,
            account_disabled: None,
            account_locked: None,
            password_must_change: None,
            user_account_control: Some("userAccountControl".to_string()),
        }
    }
}

impl PolicyAttributes {
    /// Every configured, non-blank attribute name.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.user_account_control,
            &self.account_disabled,
            &self.account_locked,
            &self.password_must_change,
            &self.ignore_expiration_warning,
            &self.password_expiration_date,
            &self.password_warning_days,
            &self.valid_password_days,
        ]
        .into_iter()
        .filter_map(|name| name.as_deref())
        .filter(|name| !name.trim().is_empty())
    }
}

/// Password policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    pub attributes: PolicyAttributes,
    /// Days a password stays valid when the entry does not say otherwise.
    pub default_valid_days: u32,
    /// Days before expiration to start warning when the entry does not say otherwise.
    pub default_warning_days: u32,
    /// Warn on every login, regardless of the warning window.
    pub always_display_warning: bool,
    /// Values of the ignore-warning attribute that exempt an entry from expiration.
    pub ignore_warning_flags: Vec<String>,
    /// Ordered; first match wins.
    pub error_definitions: Vec<ErrorDefinition>,
    pub password_policy_url: Option<String>,
}

impl Default for PolicySettings {
    fn default() -> Self {
        Self {
            attributes: PolicyAttributes::default(),
            default_valid_days: 90,
            default_warning_days: 30,
            always_display_warning: false,
            ignore_warning_flags: Vec::new(),
            error_definitions: Vec::new(),
            password_policy_url: None,
        }
    }
}

impl ValueObject for PolicySettings {}

impl PolicySettings {
    /// Parse a JSON settings document.
    pub fn from_json(raw: &str) -> ConfigResult<Self> {
        let settings: PolicySettings =
            serde_json::from_str(raw).map_err(|e| ConfigError::malformed(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = &self.password_policy_url {
            if url.trim().is_empty() {
                return Err(ConfigError::invalid("password_policy_url must not be blank"));
            }
        }
        if self.ignore_warning_flags.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::invalid("ignore_warning_flags must not contain blank values"));
        }
        Ok(())
    }

    pub fn with_attributes(mut self, attributes: PolicyAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_default_valid_days(mut self, days: u32) -> Self {
        self.default_valid_days = days;
        self
    }

    pub fn with_default_warning_days(mut self, days: u32) -> Self {
        self.default_warning_days = days;
        self
    }

    pub fn with_always_display_warning(mut self, warn_all: bool) -> Self {
        self.always_display_warning = warn_all;
        self
    }

    pub fn with_ignore_warning_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_warning_flags = flags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_error_definitions(mut self, definitions: Vec<ErrorDefinition>) -> Self {
        self.error_definitions = definitions;
        self
    }

    pub fn with_password_policy_url(mut self, url: impl Into<String>) -> Self {
        self.password_policy_url = Some(url.into());
        self
    }

    /// Whether `value` is one of the configured ignore-warning flags.
    pub fn is_ignore_flag(&self, value: &str) -> bool {
        !value.trim().is_empty() && self.ignore_warning_flags.iter().any(|f| f == value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorType;

    #[test]
    fn defaults() {
        let s = PolicySettings::default();
        assert_eq!(s.default_valid_days, 90);
        assert_eq!(s.default_warning_days, 30);
        assert!(!s.always_display_warning);
        assert_eq!(
            s.attributes.user_account_control.as_deref(),
            Some("userAccountControl")
        );
    }

    #[test]
    fn names_skip_unset_and_blank() {
        let attrs = PolicyAttributes {
            password_expiration_date: Some("pwdLastSet".into()),
            account_locked: Some("  ".into()),
            ..PolicyAttributes::default()
        };
        let names: Vec<_> = attrs.names().collect();
        assert_eq!(names, vec!["userAccountControl", "pwdLastSet"]);
    }

    #[test]
    fn partial_document_keeps_defaults() {
        let s = PolicySettings::from_json(
            r#"{
                "attributes": { "password_expiration_date": "shadowLastChange" },
                "default_warning_days": 14,
                "ignore_warning_flags": ["0"],
                "error_definitions": [{ "pattern": "data 775", "type": "accountLocked" }]
            }"#,
        )
        .unwrap();

        assert_eq!(s.default_valid_days, 90);
        assert_eq!(s.default_warning_days, 14);
        assert_eq!(s.attributes.password_expiration_date.as_deref(), Some("shadowLastChange"));
        assert_eq!(s.attributes.user_account_control.as_deref(), Some("userAccountControl"));
        assert_eq!(s.error_definitions[0].error_type(), &ErrorType::ACCOUNT_LOCKED);
    }

    #[test]
    fn negative_window_is_rejected_at_load() {
        let err = PolicySettings::from_json(r#"{ "default_valid_days": -1 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Malformed(_)));
    }

    #[test]
    fn blank_url_is_invalid() {
        let err = PolicySettings::from_json(r#"{ "password_policy_url": " " }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn blank_value_is_never_an_ignore_flag() {
        let s = PolicySettings::default().with_ignore_warning_flags(["TRUE"]);
        assert!(s.is_ignore_flag("TRUE"));
        assert!(!s.is_ignore_flag("true"));
        assert!(!s.is_ignore_flag(""));
    }
}
