//! Per-identity policy snapshot.
//!
//! Built fresh from the directory entry on every authentication attempt.
//! Malformed optional values fall back to defaults instead of failing.

use serde::Serialize;
use tracing::{debug, warn};

use pwpolicy_core::{Identity, ValueObject};

use crate::attributes::{AttributeReadError, AttributeSource, extract};
use crate::{AccountControl, PolicySettings};

/// Password/account policy values for one authentication decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyConfiguration {
    identity: Identity,
    password_expiration_date: String,
    valid_password_days: u32,
    password_warning_days: u32,
    ignore_expiration_warning: Option<String>,
    account_disabled: Option<bool>,
    account_locked: Option<bool>,
    password_must_change: Option<bool>,
    account_control: AccountControl,
}

impl ValueObject for PolicyConfiguration {}

impl PolicyConfiguration {
    /// Start a configuration with the settings' default windows.
    pub fn new(
        identity: Identity,
        password_expiration_date: impl Into<String>,
        settings: &PolicySettings,
    ) -> Self {
        Self {
            identity,
            password_expiration_date: password_expiration_date.into(),
            valid_password_days: settings.default_valid_days,
            password_warning_days: settings.default_warning_days,
            ignore_expiration_warning: None,
            account_disabled: None,
            account_locked: None,
            password_must_change: None,
            account_control: AccountControl::default(),
        }
    }

    /// Read the policy attributes of an authenticated entry.
    ///
    /// Returns `Ok(None)` when the entry has no expiration date: such entries
    /// are exempt from policy checks.
    pub fn from_entry<A>(
        identity: Identity,
        attrs: &A,
        settings: &PolicySettings,
    ) -> Result<Option<Self>, AttributeReadError>
    where
        A: AttributeSource + ?Sized,
    {
        let names = &settings.attributes;

        let Some(expiration) = extract(attrs, names.password_expiration_date.as_deref())? else {
            warn!(
                %identity,
                attribute = ?names.password_expiration_date,
                "expiration date attribute has no value; password policy does not apply"
            );
            return Ok(None);
        };

        let mut config = PolicyConfiguration::new(identity, expiration, settings);

        if let Some(days) = extract(attrs, names.password_warning_days.as_deref())?
            .as_deref()
            .and_then(parse_days)
        {
            config.password_warning_days = days;
        }

        if let Some(days) = extract(attrs, names.valid_password_days.as_deref())?
            .as_deref()
            .and_then(parse_days)
        {
            config.valid_password_days = days;
        }

        config.ignore_expiration_warning =
            extract(attrs, names.ignore_expiration_warning.as_deref())?;

        config.account_disabled = extract(attrs, names.account_disabled.as_deref())?
            .as_deref()
            .map(parse_lax_bool);
        config.account_locked = extract(attrs, names.account_locked.as_deref())?
            .as_deref()
            .map(parse_lax_bool);
        config.password_must_change = extract(attrs, names.password_must_change.as_deref())?
            .as_deref()
            .map(parse_lax_bool);

        if let Some(raw) = extract(attrs, names.user_account_control.as_deref())? {
            match AccountControl::parse(&raw) {
                Some(uac) => config.account_control = uac,
                None => debug!(identity = %config.identity, value = %raw, "ignoring unparseable account control value"),
            }
        }

        debug!(identity = %config.identity, ?config, "built password policy configuration");
        Ok(Some(config))
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Raw directory value: an expiration date or the last change date.
    pub fn password_expiration_date(&self) -> &str {
        &self.password_expiration_date
    }

    pub fn valid_password_days(&self) -> u32 {
        self.valid_password_days
    }

    pub fn password_warning_days(&self) -> u32 {
        self.password_warning_days
    }

    pub fn ignore_expiration_warning(&self) -> Option<&str> {
        self.ignore_expiration_warning.as_deref()
    }

    pub fn is_account_disabled(&self) -> bool {
        self.account_disabled.unwrap_or(false)
    }

    pub fn is_account_locked(&self) -> bool {
        self.account_locked.unwrap_or(false)
    }

    pub fn is_password_must_change(&self) -> bool {
        self.password_must_change.unwrap_or(false)
    }

    pub fn account_control(&self) -> AccountControl {
        self.account_control
    }

    pub fn with_valid_password_days(mut self, days: u32) -> Self {
        self.valid_password_days = days;
        self
    }

    pub fn with_password_warning_days(mut self, days: u32) -> Self {
        self.password_warning_days = days;
        self
    }

    pub fn with_ignore_expiration_warning(mut self, value: impl Into<String>) -> Self {
        self.ignore_expiration_warning = Some(value.into());
        self
    }

    pub fn with_account_disabled(mut self, disabled: bool) -> Self {
        self.account_disabled = Some(disabled);
        self
    }

    pub fn with_account_locked(mut self, locked: bool) -> Self {
        self.account_locked = Some(locked);
        self
    }

    pub fn with_password_must_change(mut self, must_change: bool) -> Self {
        self.password_must_change = Some(must_change);
        self
    }

    pub fn with_account_control(mut self, uac: AccountControl) -> Self {
        self.account_control = uac;
        self
    }
}

/// Non-negative integer day counts; anything else is ignored.
fn parse_days(raw: &str) -> Option<u32> {
    raw.parse::<u32>().ok()
}

/// `true` (any case) is true; every other value is false.
fn parse_lax_bool(raw: &str) -> bool {
    raw.eq_ignore_ascii_case("true")
}
