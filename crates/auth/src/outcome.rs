//! Caller-facing authentication outcomes.

use serde::{Deserialize, Serialize};

use pwpolicy_core::Identity;

use crate::ErrorType;

/// A hard rejection with enough structure for the caller to render a
/// specific message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    /// Classification tag.
    pub error_type: ErrorType,

    /// Entry the rejection applies to, when it was resolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,

    /// The violated rule: attribute name, status flag, or matched pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    /// Days left until the password expires (0 once expired).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_to_expiration: Option<i64>,

    /// Human-readable message. Never raw directory text.
    pub message: String,
}

impl Rejection {
    pub fn new(error_type: ErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            identity: None,
            rule: None,
            days_to_expiration: None,
            message: message.into(),
        }
    }

    pub fn bad_credentials() -> Self {
        Self::new(ErrorType::BAD_CREDENTIALS, "Invalid username or password.")
    }

    pub fn with_identity(mut self, identity: Identity) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    pub fn with_days_to_expiration(mut self, days: i64) -> Self {
        self.days_to_expiration = Some(days);
        self
    }
}

impl core::fmt::Display for Rejection {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

/// Metadata attached to a successful login whose password expires soon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpirationWarning {
    pub identity: Identity,
    pub days_remaining: i64,
    /// Where the user can change their password, if configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_policy_url: Option<String>,
}

/// Result of [`crate::PasswordPolicyHandler::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AuthenticationOutcome {
    Authenticated,
    AuthenticatedWithWarning(ExpirationWarning),
    Rejected(Rejection),
}

impl AuthenticationOutcome {
    pub fn is_authenticated(&self) -> bool {
        !matches!(self, AuthenticationOutcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            AuthenticationOutcome::Rejected(r) => Some(r),
            _ => None,
        }
    }

    pub fn warning(&self) -> Option<&ExpirationWarning> {
        match self {
            AuthenticationOutcome::AuthenticatedWithWarning(w) => Some(w),
            _ => None,
        }
    }
}

/// The event a login flow routes on after an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEvent {
    pub event_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expire_days: Option<i64>,
}

impl FlowEvent {
    pub const SUCCESS: &'static str = "success";
    pub const SHOW_WARNING: &'static str = "showWarning";
}

impl From<&AuthenticationOutcome> for FlowEvent {
    fn from(outcome: &AuthenticationOutcome) -> Self {
        match outcome {
            AuthenticationOutcome::Authenticated => FlowEvent {
                event_id: FlowEvent::SUCCESS.to_string(),
                expire_days: None,
            },
            AuthenticationOutcome::AuthenticatedWithWarning(w) => FlowEvent {
                event_id: FlowEvent::SHOW_WARNING.to_string(),
                expire_days: Some(w.days_remaining),
            },
            AuthenticationOutcome::Rejected(r) => FlowEvent {
                event_id: r.error_type.to_string(),
                expire_days: r.days_to_expiration,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_routes_to_show_warning_with_days() {
        let outcome = AuthenticationOutcome::AuthenticatedWithWarning(ExpirationWarning {
            identity: Identity::new("cn=alice"),
            days_remaining: 12,
            password_policy_url: None,
        });
        let event = FlowEvent::from(&outcome);
        assert_eq!(event.event_id, "showWarning");
        assert_eq!(event.expire_days, Some(12));
        assert!(outcome.is_authenticated());
    }

    #[test]
    fn rejection_routes_to_its_type() {
        let outcome = AuthenticationOutcome::Rejected(
            Rejection::new(ErrorType::PASSWORD_EXPIRED, "expired").with_days_to_expiration(0),
        );
        let event = FlowEvent::from(&outcome);
        assert_eq!(event.event_id, "passwordExpired");
        assert_eq!(event.expire_days, Some(0));
        assert!(!outcome.is_authenticated());
    }

    #[test]
    fn outcome_serializes_with_tag() {
        let json = serde_json::to_value(AuthenticationOutcome::Rejected(Rejection::bad_credentials()))
            .unwrap();
        assert_eq!(json["outcome"], "rejected");
        assert_eq!(json["error_type"], "badCredentials");
        assert!(json.get("days_to_expiration").is_none());
    }
}
