//! Password-policy-aware authentication.
//!
//! ```text
//! Credentials
//!   ↓
//! 1. Bind via the directory (error → classifier → Rejected)
//!   ↓
//! 2. Build PolicyConfiguration (no entry / no expiration date → Authenticated)
//!   ↓
//! 3. Account status (first violation → Rejected)
//!   ↓
//! 4. Password expiration (expired or unconvertible → Rejected, warning → AuthenticatedWithWarning)
//! ```
//!
//! Every directory-layer failure goes through the error classifier before it
//! reaches the caller.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::classifier::classify_error;
use crate::expiration::{ExpirationCheck, examine_password_expiration};
use crate::status::examine_account_status;
use crate::{
    AuthenticationOutcome, BindOutcome, Credentials, DateConverter, DirectoryAuthenticator, ErrorType,
    ExpirationWarning, PolicyConfiguration, PolicySettings, Rejection,
};

/// Wraps a directory authenticator with password policy enforcement.
///
/// Settings are fixed at construction; `authenticate` takes `&self` and keeps
/// no per-request state, so one handler serves concurrent logins.
pub struct PasswordPolicyHandler<D, C> {
    directory: D,
    converter: C,
    settings: PolicySettings,
}

impl<D, C> PasswordPolicyHandler<D, C>
where
    D: DirectoryAuthenticator,
    C: DateConverter,
{
    /// Build the handler.
    ///
    /// Adds every configured policy attribute to the directory's requested
    /// attributes, once, before any bind happens.
    pub fn new(mut directory: D, converter: C, settings: PolicySettings) -> Self {
        let mut requested = directory.attributes_to_return().to_vec();
        for name in settings.attributes.names() {
            if !requested.iter().any(|r| r.eq_ignore_ascii_case(name)) {
                requested.push(name.to_string());
            }
        }
        debug!(directory = directory.name(), attributes = ?requested, "requesting policy attributes");
        directory.set_attributes_to_return(requested);

        if settings.attributes.password_expiration_date.is_none() {
            warn!("no expiration date attribute configured; password policy checks will be skipped");
        }

        Self {
            directory,
            converter,
            settings,
        }
    }

    pub fn settings(&self) -> &PolicySettings {
        &self.settings
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn authenticate(&self, credentials: &Credentials) -> AuthenticationOutcome {
        self.authenticate_at(credentials, Utc::now())
    }

    /// [`Self::authenticate`] with an explicit current time.
    pub fn authenticate_at(&self, credentials: &Credentials, now: DateTime<Utc>) -> AuthenticationOutcome {
        let entry = match self.directory.bind(credentials) {
            Ok(BindOutcome::Authenticated(Some(entry))) => entry,
            Ok(BindOutcome::Authenticated(None)) => {
                warn!(
                    directory = self.directory.name(),
                    username = %credentials.username,
                    "authentication succeeded but the entry cannot be found; skipping password policy checks"
                );
                return AuthenticationOutcome::Authenticated;
            }
            Ok(BindOutcome::Rejected) => {
                debug!(username = %credentials.username, "directory rejected credentials");
                return AuthenticationOutcome::Rejected(Rejection::bad_credentials());
            }
            Err(e) => {
                debug!(username = %credentials.username, error = %e, "directory bind failed");
                return AuthenticationOutcome::Rejected(self.classify(e.message()));
            }
        };

        let config =
            match PolicyConfiguration::from_entry(entry.name, &entry.attributes, &self.settings) {
                Ok(Some(config)) => config,
                Ok(None) => {
                    warn!(
                        username = %credentials.username,
                        "password policy configuration could not be constructed; skipping password policy checks"
                    );
                    return AuthenticationOutcome::Authenticated;
                }
                Err(e) => {
                    debug!(username = %credentials.username, error = %e, "reading policy attributes failed");
                    return AuthenticationOutcome::Rejected(self.classify(&e.to_string()));
                }
            };

        if let Err(violation) = examine_account_status(&config, &self.settings.attributes) {
            info!(identity = %config.identity(), error_type = %violation.error_type(), "account status rejected login");
            return AuthenticationOutcome::Rejected(violation.into());
        }

        match examine_password_expiration(&config, &self.settings, &self.converter, now) {
            Ok(ExpirationCheck::Expired) => {
                info!(identity = %config.identity(), "password expired");
                let mut rejection = Rejection::new(ErrorType::PASSWORD_EXPIRED, "Your password has expired.")
                    .with_identity(config.identity().clone())
                    .with_days_to_expiration(0);
                if let Some(attr) = &self.settings.attributes.password_expiration_date {
                    rejection = rejection.with_rule(attr.clone());
                }
                AuthenticationOutcome::Rejected(rejection)
            }
            Ok(ExpirationCheck::Warning { days_remaining }) => {
                info!(identity = %config.identity(), days_remaining, "password expires soon");
                AuthenticationOutcome::AuthenticatedWithWarning(ExpirationWarning {
                    identity: config.identity().clone(),
                    days_remaining,
                    password_policy_url: self.settings.password_policy_url.clone(),
                })
            }
            Ok(ExpirationCheck::NeverExpires | ExpirationCheck::NotExpiring { .. }) => {
                AuthenticationOutcome::Authenticated
            }
            Err(e) => {
                warn!(
                    identity = %config.identity(),
                    error = %e,
                    "expiration date cannot be converted; rejecting login"
                );
                let mut rejection = self.classify(&e.to_string()).with_identity(config.identity().clone());
                if let Some(attr) = &self.settings.attributes.password_expiration_date {
                    rejection = rejection.with_rule(attr.clone());
                }
                AuthenticationOutcome::Rejected(rejection)
            }
        }
    }

    fn classify(&self, raw: &str) -> Rejection {
        classify_error(&self.settings.error_definitions, raw)
    }
}
