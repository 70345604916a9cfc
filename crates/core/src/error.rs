//! Configuration error model.

use thiserror::Error;

/// Result type used while assembling policy settings.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration-level error.
///
/// Raised only while settings are loaded at startup. Per-request evaluation
/// never produces these.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A settings value failed validation.
    #[error("invalid setting: {0}")]
    Invalid(String),

    /// An error definition carried a pattern that does not compile.
    #[error("invalid error definition pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The settings document could not be parsed.
    #[error("malformed settings: {0}")]
    Malformed(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}
