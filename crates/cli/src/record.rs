//! Offline evaluation input.

use anyhow::{Context, bail};
use chrono::FixedOffset;
use serde::Deserialize;

use pwpolicy_auth::{
    ActiveDirectoryConverter, Credentials, DateConverter, DirectoryAccount, EpochOffsetConverter, EpochUnit,
    GeneralizedTimeConverter,
};

/// A recorded login: what the user typed and what the directory holds.
#[derive(Debug, Deserialize)]
pub struct LoginRecord {
    pub credentials: Credentials,
    pub account: DirectoryAccount,
    #[serde(default)]
    pub converter: ConverterSpec,
    /// Attributes the directory already requests before policy setup.
    #[serde(default)]
    pub attributes_to_return: Vec<String>,
}

/// Which directory date format the expiration attribute uses.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConverterSpec {
    GeneralizedTime {
        #[serde(default)]
        utc_offset_minutes: i32,
    },
    ActiveDirectory {
        #[serde(default)]
        utc_offset_minutes: i32,
    },
    EpochOffset {
        unit: EpochUnit,
        #[serde(default)]
        utc_offset_minutes: i32,
    },
}

impl Default for ConverterSpec {
    fn default() -> Self {
        ConverterSpec::GeneralizedTime { utc_offset_minutes: 0 }
    }
}

impl ConverterSpec {
    pub fn build(&self) -> anyhow::Result<Box<dyn DateConverter>> {
        let minutes = match self {
            ConverterSpec::GeneralizedTime { utc_offset_minutes }
            | ConverterSpec::ActiveDirectory { utc_offset_minutes }
            | ConverterSpec::EpochOffset { utc_offset_minutes, .. } => *utc_offset_minutes,
        };
        let Some(zone) = FixedOffset::east_opt(minutes * 60) else {
            bail!("utc_offset_minutes {minutes} is out of range");
        };

        Ok(match self {
            ConverterSpec::GeneralizedTime { .. } => Box::new(GeneralizedTimeConverter::new(zone)),
            ConverterSpec::ActiveDirectory { .. } => Box::new(ActiveDirectoryConverter::new(zone)),
            ConverterSpec::EpochOffset { unit, .. } => Box::new(EpochOffsetConverter::new(*unit, zone)),
        })
    }
}

impl LoginRecord {
    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("malformed login record")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_defaults_to_generalized_time_utc() {
        let record = LoginRecord::from_json(
            r#"{
                "credentials": { "username": "alice", "password": "pw" },
                "account": { "password": "pw" }
            }"#,
        )
        .unwrap();
        assert_eq!(record.credentials.username, "alice");
        assert!(record.account.entry.is_none());
        let converter = record.converter.build().unwrap();
        assert_eq!(converter.time_zone(), FixedOffset::east_opt(0).unwrap());
    }

    #[test]
    fn shadow_converter_spec() {
        let spec: ConverterSpec =
            serde_json::from_str(r#"{ "kind": "epoch_offset", "unit": "days", "utc_offset_minutes": 60 }"#).unwrap();
        let converter = spec.build().unwrap();
        assert_eq!(converter.time_zone(), FixedOffset::east_opt(3600).unwrap());
        assert!(converter.convert("19723").is_ok());
    }

    #[test]
    fn out_of_range_offset_is_rejected() {
        let spec = ConverterSpec::ActiveDirectory { utc_offset_minutes: 24 * 60 };
        assert!(spec.build().is_err());
    }
}
