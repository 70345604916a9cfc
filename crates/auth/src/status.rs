//! Account status evaluation.
//!
//! Fixed order, first violation wins: account-control flags (disabled,
//! locked, password expired), then the boolean policy attributes (disabled,
//! locked, must change password).

use thiserror::Error;
use tracing::debug;

use pwpolicy_core::Identity;

use crate::{AccountControlFlag, ErrorType, PolicyAttributes, PolicyConfiguration, Rejection};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountStatusViolation {
    #[error("account control flag {flag} is set; account {identity} is disabled")]
    DisabledByFlag { identity: Identity, flag: AccountControlFlag },

    #[error("account control flag {flag} is set; account {identity} is locked")]
    LockedByFlag { identity: Identity, flag: AccountControlFlag },

    #[error("account control flag {flag} is set; password of {identity} has expired")]
    ExpiredByFlag { identity: Identity, flag: AccountControlFlag },

    #[error("policy attribute {attribute} is set; account {identity} is disabled")]
    DisabledByAttribute { identity: Identity, attribute: String },

    #[error("policy attribute {attribute} is set; account {identity} is locked")]
    LockedByAttribute { identity: Identity, attribute: String },

    #[error("policy attribute {attribute} is set; account {identity} must change its password")]
    MustChangePassword { identity: Identity, attribute: String },
}

impl AccountStatusViolation {
    pub fn error_type(&self) -> ErrorType {
        match self {
            Self::DisabledByFlag { .. } | Self::DisabledByAttribute { .. } => ErrorType::ACCOUNT_DISABLED,
            Self::LockedByFlag { .. } | Self::LockedByAttribute { .. } => ErrorType::ACCOUNT_LOCKED,
            Self::ExpiredByFlag { .. } => ErrorType::ACCOUNT_PASSWORD_EXPIRED,
            Self::MustChangePassword { .. } => ErrorType::ACCOUNT_MUST_CHANGE_PASSWORD,
        }
    }

    pub fn identity(&self) -> &Identity {
        match self {
            Self::DisabledByFlag { identity, .. }
            | Self::LockedByFlag { identity, .. }
            | Self::ExpiredByFlag { identity, .. }
            | Self::DisabledByAttribute { identity, .. }
            | Self::LockedByAttribute { identity, .. }
            | Self::MustChangePassword { identity, .. } => identity,
        }
    }

    /// Name of the flag or attribute that triggered the violation.
    pub fn rule(&self) -> &str {
        match self {
            Self::DisabledByFlag { flag, .. }
            | Self::LockedByFlag { flag, .. }
            | Self::ExpiredByFlag { flag, .. } => flag.as_str(),
            Self::DisabledByAttribute { attribute, .. }
            | Self::LockedByAttribute { attribute, .. }
            | Self::MustChangePassword { attribute, .. } => attribute,
        }
    }

    fn user_message(&self) -> &'static str {
        match self {
            Self::DisabledByFlag { .. } | Self::DisabledByAttribute { .. } => "Your account is disabled.",
            Self::LockedByFlag { .. } | Self::LockedByAttribute { .. } => "Your account is locked.",
            Self::ExpiredByFlag { .. } => "Your password has expired.",
            Self::MustChangePassword { .. } => "You must change your password.",
        }
    }
}

impl From<AccountStatusViolation> for Rejection {
    fn from(violation: AccountStatusViolation) -> Self {
        Rejection::new(violation.error_type(), violation.user_message())
            .with_rule(violation.rule())
            .with_identity(violation.identity().clone())
    }
}

/// Check the account status of an authenticated entry.
///
/// - No IO
/// - No panics
pub fn examine_account_status(
    config: &PolicyConfiguration,
    names: &PolicyAttributes,
) -> Result<(), AccountStatusViolation> {
    let identity = config.identity();
    let uac = config.account_control();

    if !uac.is_empty() {
        let flag_checks = [
            (AccountControlFlag::AccountDisabled, StatusFlag::Disabled),
            (AccountControlFlag::Lockout, StatusFlag::Locked),
            (AccountControlFlag::PasswordExpired, StatusFlag::Expired),
        ];
        if let Some((flag, kind)) = flag_checks.into_iter().find(|(f, _)| uac.contains(*f)) {
            let identity = identity.clone();
            let violation = match kind {
                StatusFlag::Disabled => AccountStatusViolation::DisabledByFlag { identity, flag },
                StatusFlag::Locked => AccountStatusViolation::LockedByFlag { identity, flag },
                StatusFlag::Expired => AccountStatusViolation::ExpiredByFlag { identity, flag },
            };
            debug!(%violation, "account status check failed");
            return Err(violation);
        }
    }

    let attribute_name = |name: &Option<String>| name.clone().unwrap_or_default();

    let violation = if config.is_account_disabled() {
        AccountStatusViolation::DisabledByAttribute {
            identity: identity.clone(),
            attribute: attribute_name(&names.account_disabled),
        }
    } else if config.is_account_locked() {
        AccountStatusViolation::LockedByAttribute {
            identity: identity.clone(),
            attribute: attribute_name(&names.account_locked),
        }
    } else if config.is_password_must_change() {
        AccountStatusViolation::MustChangePassword {
            identity: identity.clone(),
            attribute: attribute_name(&names.password_must_change),
        }
    } else {
        return Ok(());
    };

    debug!(%violation, "account status check failed");
    Err(violation)
}

#[derive(Clone, Copy)]
enum StatusFlag {
    Disabled,
    Locked,
    Expired,
}
