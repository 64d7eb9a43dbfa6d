use chrono::prelude::*;
use chrono_tz::Tz;

/// Storage format for reminder trigger times. Always UTC, second precision.
pub const DT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// Format used when showing a trigger time back to its owner.
pub const CONFIRM_DT_FORMAT: &str = "%b %d, %Y @ %I:%M:%S%p";

pub fn format_dt(dt: &DateTime<Utc>) -> String {
    dt.format(DT_FORMAT).to_string()
}

pub fn parse_dt(datestr: &str) -> anyhow::Result<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(datestr, DT_FORMAT)
        .map_err(|e| anyhow::Error::msg(format!("{}: {}", datestr, e)))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Drops sub-second precision, the persisted format cannot hold it anyway.
pub fn truncate_to_seconds(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub fn format_local_dt(dt: &DateTime<Tz>) -> String {
    dt.format(CONFIRM_DT_FORMAT).to_string()
}
