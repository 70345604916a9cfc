//! Directory date conversion.
//!
//! Each converter carries the time zone that all expiration arithmetic is done
//! in; "now" must be taken in the same zone.

use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DateConversionError {
    #[error("unrecognized date value '{value}': {reason}")]
    Unparseable { value: String, reason: String },

    #[error("date value '{0}' is out of range")]
    OutOfRange(String),
}

impl DateConversionError {
    fn unparseable(value: &str, reason: impl Into<String>) -> Self {
        Self::Unparseable {
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Converts raw directory date values into zoned instants.
pub trait DateConverter: Send + Sync {
    /// Zone for conversions and for the current time.
    fn time_zone(&self) -> FixedOffset;

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, DateConversionError>;

    /// Current time in [`DateConverter::time_zone`].
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.time_zone())
    }
}

impl<T: DateConverter + ?Sized> DateConverter for Box<T> {
    fn time_zone(&self) -> FixedOffset {
        (**self).time_zone()
    }

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, DateConversionError> {
        (**self).convert(raw)
    }

    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

fn utc() -> FixedOffset {
    Utc.fix()
}

/// LDAP generalized time: `YYYYMMDDHHMMSS[.fraction](Z|±HHMM)`.
///
/// Values without a zone designator are read in the converter's zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneralizedTimeConverter {
    time_zone: FixedOffset,
}

impl GeneralizedTimeConverter {
    pub fn new(time_zone: FixedOffset) -> Self {
        Self { time_zone }
    }

    pub fn utc() -> Self {
        Self::new(utc())
    }
}

impl DateConverter for GeneralizedTimeConverter {
    fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, DateConversionError> {
        let value = raw.trim();

        if let Some(naive) = value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
            let parsed = NaiveDateTime::parse_from_str(naive, "%Y%m%d%H%M%S%.f")
                .map_err(|e| DateConversionError::unparseable(raw, e.to_string()))?;
            return Ok(Utc.from_utc_datetime(&parsed).with_timezone(&self.time_zone));
        }

        if let Ok(zoned) = DateTime::parse_from_str(value, "%Y%m%d%H%M%S%.f%z") {
            return Ok(zoned.with_timezone(&self.time_zone));
        }

        let parsed = NaiveDateTime::parse_from_str(value, "%Y%m%d%H%M%S%.f")
            .map_err(|e| DateConversionError::unparseable(raw, e.to_string()))?;
        self.time_zone
            .from_local_datetime(&parsed)
            .single()
            .ok_or_else(|| DateConversionError::OutOfRange(raw.to_string()))
    }
}

/// Active Directory FILETIME: 100 ns ticks since 1601-01-01 UTC
/// (`pwdLastSet`, `accountExpires`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveDirectoryConverter {
    time_zone: FixedOffset,
}

impl ActiveDirectoryConverter {
    /// Ticks between 1601-01-01 and 1970-01-01.
    pub const WINDOWS_EPOCH_DIFF: i64 = 116_444_736_000_000_000;
    const TICKS_PER_SECOND: i64 = 10_000_000;

    pub fn new(time_zone: FixedOffset) -> Self {
        Self { time_zone }
    }

    pub fn utc() -> Self {
        Self::new(utc())
    }
}

impl DateConverter for ActiveDirectoryConverter {
    fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, DateConversionError> {
        let ticks: i64 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| DateConversionError::unparseable(raw, e.to_string()))?;

        if ticks < 0 {
            return Err(DateConversionError::OutOfRange(raw.to_string()));
        }

        // 0 ("must change at next logon") lands on 1601-01-01, long expired.
        let unix_ticks = ticks - Self::WINDOWS_EPOCH_DIFF;
        let secs = unix_ticks.div_euclid(Self::TICKS_PER_SECOND);
        let nanos = (unix_ticks.rem_euclid(Self::TICKS_PER_SECOND) * 100) as u32;

        DateTime::from_timestamp(secs, nanos)
            .map(|dt| dt.with_timezone(&self.time_zone))
            .ok_or_else(|| DateConversionError::OutOfRange(raw.to_string()))
    }
}

/// Unit of an integer offset from the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpochUnit {
    /// e.g. `shadowLastChange`
    Days,
    Seconds,
    Milliseconds,
}

/// Integer count of [`EpochUnit`]s since 1970-01-01 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochOffsetConverter {
    unit: EpochUnit,
    time_zone: FixedOffset,
}

impl EpochOffsetConverter {
    pub fn new(unit: EpochUnit, time_zone: FixedOffset) -> Self {
        Self { unit, time_zone }
    }

    pub fn utc(unit: EpochUnit) -> Self {
        Self::new(unit, utc())
    }
}

impl DateConverter for EpochOffsetConverter {
    fn time_zone(&self) -> FixedOffset {
        self.time_zone
    }

    fn convert(&self, raw: &str) -> Result<DateTime<FixedOffset>, DateConversionError> {
        let amount: i64 = raw
            .trim()
            .parse()
            .map_err(|e: std::num::ParseIntError| DateConversionError::unparseable(raw, e.to_string()))?;

        let offset = match self.unit {
            EpochUnit::Days => Duration::try_days(amount),
            EpochUnit::Seconds => Duration::try_seconds(amount),
            EpochUnit::Milliseconds => Duration::try_milliseconds(amount),
        }
        .ok_or_else(|| DateConversionError::OutOfRange(raw.to_string()))?;

        DateTime::<Utc>::UNIX_EPOCH
            .checked_add_signed(offset)
            .map(|dt| dt.with_timezone(&self.time_zone))
            .ok_or_else(|| DateConversionError::OutOfRange(raw.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn generalized_time_utc() {
        let c = GeneralizedTimeConverter::utc();
        assert_eq!(c.convert("20240315103000Z").unwrap(), at("2024-03-15T10:30:00Z"));
        assert_eq!(c.convert("20240315103000.5Z").unwrap(), at("2024-03-15T10:30:00.5Z"));
    }

    #[test]
    fn generalized_time_with_offset_lands_in_converter_zone() {
        let est = FixedOffset::west_opt(5 * 3600).unwrap();
        let c = GeneralizedTimeConverter::new(est);
        let dt = c.convert("20240315103000+0100").unwrap();
        assert_eq!(dt, at("2024-03-15T09:30:00Z"));
        assert_eq!(dt.offset(), &est);
    }

    #[test]
    fn generalized_time_without_zone_uses_converter_zone() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        let dt = GeneralizedTimeConverter::new(cet).convert("20240315103000").unwrap();
        assert_eq!(dt, at("2024-03-15T10:30:00+01:00"));
    }

    #[test]
    fn generalized_time_rejects_garbage() {
        let err = GeneralizedTimeConverter::utc().convert("yesterday").unwrap_err();
        assert!(matches!(err, DateConversionError::Unparseable { .. }));
    }

    #[test]
    fn filetime_converts_to_unix_time() {
        let c = ActiveDirectoryConverter::utc();
        // 2024-01-01T00:00:00Z
        let ticks = ActiveDirectoryConverter::WINDOWS_EPOCH_DIFF + 1_704_067_200 * 10_000_000;
        assert_eq!(c.convert(&ticks.to_string()).unwrap(), at("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn filetime_zero_is_the_windows_epoch() {
        let dt = ActiveDirectoryConverter::utc().convert("0").unwrap();
        assert_eq!(dt, at("1601-01-01T00:00:00Z"));
    }

    #[test]
    fn filetime_negative_is_out_of_range() {
        let err = ActiveDirectoryConverter::utc().convert("-1").unwrap_err();
        assert!(matches!(err, DateConversionError::OutOfRange(_)));
    }

    #[test]
    fn shadow_last_change_days() {
        let c = EpochOffsetConverter::utc(EpochUnit::Days);
        // 19723 days after 1970-01-01 is 2024-01-01.
        assert_eq!(c.convert("19723").unwrap(), at("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn epoch_seconds_and_millis() {
        let s = EpochOffsetConverter::utc(EpochUnit::Seconds);
        let ms = EpochOffsetConverter::utc(EpochUnit::Milliseconds);
        assert_eq!(s.convert("1704067200").unwrap(), at("2024-01-01T00:00:00Z"));
        assert_eq!(ms.convert("1704067200000").unwrap(), at("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn now_is_in_converter_zone() {
        let tz = FixedOffset::east_opt(9 * 3600).unwrap();
        let c = GeneralizedTimeConverter::new(tz);
        assert_eq!(c.now().offset(), &tz);
    }
}
