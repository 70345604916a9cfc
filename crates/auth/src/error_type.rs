use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Classification tag carried by a rejected authentication.
///
/// Tags are intentionally opaque strings at this layer: deployments define
/// their own through error definitions, and the caller maps tags to views.
/// The well-known tags produced by the evaluators are provided as constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorType(Cow<'static, str>);

impl ErrorType {
    /// No definition matched, or the bind simply failed.
    pub const BAD_CREDENTIALS: ErrorType = ErrorType::from_static("badCredentials");
    pub const ACCOUNT_DISABLED: ErrorType = ErrorType::from_static("accountDisabled");
    pub const ACCOUNT_LOCKED: ErrorType = ErrorType::from_static("accountLocked");
    /// Status flag says the password has expired.
    pub const ACCOUNT_PASSWORD_EXPIRED: ErrorType = ErrorType::from_static("accountPasswordExpired");
    pub const ACCOUNT_MUST_CHANGE_PASSWORD: ErrorType =
        ErrorType::from_static("accountMustChangePassword");
    /// The computed expiration date has passed.
    pub const PASSWORD_EXPIRED: ErrorType = ErrorType::from_static("passwordExpired");
    pub const INVALID_LOGON_HOURS: ErrorType = ErrorType::from_static("invalidLogonHours");
    pub const INVALID_WORKSTATION: ErrorType = ErrorType::from_static("invalidWorkstation");

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owned_and_static_tags_compare_by_value() {
        assert_eq!(ErrorType::new(String::from("accountLocked")), ErrorType::ACCOUNT_LOCKED);
    }

    #[test]
    fn expiration_tags_are_distinct() {
        assert_ne!(ErrorType::PASSWORD_EXPIRED, ErrorType::ACCOUNT_PASSWORD_EXPIRED);
    }
}
