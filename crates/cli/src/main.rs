//! `pwpolicy-eval`: dry-run a login against password policy settings.
//!
//! Usage: `pwpolicy-eval [SETTINGS.json] RECORD.json [--now RFC3339]`
//!
//! The settings path may also come from `PWPOLICY_SETTINGS`. Prints the
//! outcome and the resulting flow event as JSON on stdout.

mod record;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde_json::json;

use pwpolicy_auth::{FlowEvent, InMemoryDirectory, PasswordPolicyHandler, PolicySettings};

use record::LoginRecord;

struct Args {
    settings: String,
    record: String,
    now: Option<DateTime<Utc>>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut positional = Vec::new();
    let mut now = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--now" {
            let value = args.next().context("--now needs a value")?;
            let parsed = DateTime::parse_from_rfc3339(&value)
                .with_context(|| format!("invalid --now value '{value}'"))?;
            now = Some(parsed.with_timezone(&Utc));
        } else {
            positional.push(arg);
        }
    }

    let (settings, record) = match positional.as_slice() {
        [settings, record] => (settings.clone(), record.clone()),
        [record] => {
            let settings = std::env::var("PWPOLICY_SETTINGS")
                .context("no settings path given and PWPOLICY_SETTINGS is not set")?;
            (settings, record.clone())
        }
        _ => bail!("usage: pwpolicy-eval [SETTINGS.json] RECORD.json [--now RFC3339]"),
    };

    Ok(Args { settings, record, now })
}

fn main() -> anyhow::Result<()> {
    pwpolicy_observability::init();

    let args = parse_args()?;

    let raw_settings = std::fs::read_to_string(&args.settings)
        .with_context(|| format!("reading settings from {}", args.settings))?;
    let settings = PolicySettings::from_json(&raw_settings)?;

    let raw_record = std::fs::read_to_string(&args.record)
        .with_context(|| format!("reading login record from {}", args.record))?;
    let record = LoginRecord::from_json(&raw_record)?;

    let converter = record.converter.build()?;
    let directory = InMemoryDirectory::new()
        .with_attributes_to_return(record.attributes_to_return)
        .with_account(record.credentials.username.clone(), record.account);

    let handler = PasswordPolicyHandler::new(directory, converter, settings);
    let now = args.now.unwrap_or_else(Utc::now);

    tracing::info!(username = %record.credentials.username, %now, "evaluating login");
    let outcome = handler.authenticate_at(&record.credentials, now);

    let report = json!({
        "result": outcome,
        "flow_event": FlowEvent::from(&outcome),
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
