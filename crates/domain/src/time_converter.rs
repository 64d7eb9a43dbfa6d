use crate::date::{format_local_dt, truncate_to_seconds};
use crate::time_parser::TimeExpressionParser;
use chrono::{offset::LocalResult, DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq)]
#[error("Unable to understand the time expression: `{0}`")]
pub struct UnparseableTime(pub String);

/// Converts between free form local time expressions and UTC instants.
/// It only converts, rejecting times in the past is up to the caller.
pub struct TimeConverter<'a> {
    parser: &'a dyn TimeExpressionParser,
}

impl<'a> TimeConverter<'a> {
    pub fn new(parser: &'a dyn TimeExpressionParser) -> Self {
        Self { parser }
    }

    /// Parses `expression` anchored at `now` seen from `timezone` and
    /// returns the resulting instant in UTC, truncated to whole seconds.
    pub fn to_utc(
        &self,
        expression: &str,
        timezone: &Tz,
        now: &DateTime<Utc>,
    ) -> Result<DateTime<Utc>, UnparseableTime> {
        let local_now = now.with_timezone(timezone).naive_local();
        let parsed = match self.parser.parse(expression, local_now) {
            Some(parsed) => parsed,
            None => {
                debug!("Unable to parse time expression: {}", expression);
                return Err(UnparseableTime(expression.to_string()));
            }
        };

        localize(timezone, &parsed)
            .map(|dt| truncate_to_seconds(dt.with_timezone(&Utc)))
            .ok_or_else(|| UnparseableTime(expression.to_string()))
    }

    pub fn to_local(utc: &DateTime<Utc>, timezone: &Tz) -> DateTime<Tz> {
        utc.with_timezone(timezone)
    }

    pub fn to_local_display(utc: &DateTime<Utc>, timezone: &Tz) -> String {
        format_local_dt(&Self::to_local(utc, timezone))
    }
}

/// Attaches `timezone` to a wall clock time. Ambiguous times (DST fall back)
/// take the earliest instant, times inside a DST gap are moved one hour forward.
pub fn localize(timezone: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match timezone.from_local_datetime(naive) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let shifted = naive.checked_add_signed(Duration::hours(1))?;
            timezone.from_local_datetime(&shifted).earliest()
        }
    }
}
