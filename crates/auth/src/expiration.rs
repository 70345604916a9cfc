//! Password expiration and warning-window arithmetic.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::Serialize;
use tracing::debug;

use crate::{AccountControlFlag, DateConversionError, DateConverter, PolicyConfiguration, PolicySettings};

/// Result of the expiration check for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExpirationCheck {
    /// Exempt by ignore flag or by the never-expires account-control bit.
    NeverExpires,
    /// Expires later; outside the warning window.
    NotExpiring { days_remaining: i64 },
    /// Inside the warning window (or warning everyone).
    Warning { days_remaining: i64 },
    /// Expiration instant is at or before now.
    Expired,
}

impl ExpirationCheck {
    /// Days-to-expiration as reported to callers: `-1` means "don't warn",
    /// `0` means expired.
    pub fn days_to_expiration(&self) -> i64 {
        match self {
            ExpirationCheck::NeverExpires | ExpirationCheck::NotExpiring { .. } => -1,
            ExpirationCheck::Warning { days_remaining } => *days_remaining,
            ExpirationCheck::Expired => 0,
        }
    }
}

/// Whether the entry is exempt from expiration checks.
pub fn is_password_set_to_never_expire(config: &PolicyConfiguration, settings: &PolicySettings) -> bool {
    if config
        .ignore_expiration_warning()
        .is_some_and(|value| settings.is_ignore_flag(value))
    {
        return true;
    }

    config
        .account_control()
        .contains(AccountControlFlag::DontExpirePasswd)
}

/// Stored date plus the validity window.
pub fn expiration_instant<C>(
    config: &PolicyConfiguration,
    converter: &C,
) -> Result<DateTime<FixedOffset>, DateConversionError>
where
    C: DateConverter + ?Sized,
{
    let stored = converter.convert(config.password_expiration_date())?;
    let expires_at = stored
        .checked_add_signed(Duration::days(i64::from(config.valid_password_days())))
        .ok_or_else(|| DateConversionError::OutOfRange(config.password_expiration_date().to_string()))?;

    debug!(
        identity = %config.identity(),
        %stored,
        valid_days = config.valid_password_days(),
        %expires_at,
        "computed password expiration date"
    );
    Ok(expires_at)
}

/// Classify `now` against an expiration instant.
///
/// The day count is the truncated whole-day distance from `now`, computed
/// once and reused for every outcome.
pub fn check_expiration(
    config: &PolicyConfiguration,
    settings: &PolicySettings,
    expires_at: DateTime<FixedOffset>,
    now: DateTime<FixedOffset>,
) -> ExpirationCheck {
    let days_remaining = (expires_at - now).num_days();

    if expires_at <= now {
        debug!(
            identity = %config.identity(),
            %expires_at,
            %now,
            days_remaining,
            "password has expired"
        );
        return ExpirationCheck::Expired;
    }

    // A window reaching past the representable range has always started.
    let warn_from =
        expires_at.checked_sub_signed(Duration::days(i64::from(config.password_warning_days())));
    debug!(?warn_from, "warning period start");

    if settings.always_display_warning {
        debug!(identity = %config.identity(), days_remaining, "warning all; password will expire");
        ExpirationCheck::Warning { days_remaining }
    } else if warn_from.is_none_or(|start| now >= start) {
        debug!(identity = %config.identity(), days_remaining, "password will expire");
        ExpirationCheck::Warning { days_remaining }
    } else {
        debug!(identity = %config.identity(), days_remaining, "password is not expiring yet");
        ExpirationCheck::NotExpiring { days_remaining }
    }
}

/// Full expiration check: exemption, expiration instant, then warning window.
///
/// `now` is re-expressed in the converter's zone before comparing.
pub fn examine_password_expiration<C>(
    config: &PolicyConfiguration,
    settings: &PolicySettings,
    converter: &C,
    now: DateTime<Utc>,
) -> Result<ExpirationCheck, DateConversionError>
where
    C: DateConverter + ?Sized,
{
    if is_password_set_to_never_expire(config, settings) {
        debug!(identity = %config.identity(), "password never expires; skipping expiration check");
        return Ok(ExpirationCheck::NeverExpires);
    }

    let expires_at = expiration_instant(config, converter)?;
    let now = now.with_timezone(&converter.time_zone());
    Ok(check_expiration(config, settings, expires_at, now))
}
