use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Turns a free form time phrase into a wall clock datetime.
///
/// `now` is the current wall clock time in the timezone the phrase should be
/// interpreted in, and so is the returned value.
pub trait TimeExpressionParser: Send + Sync {
    fn parse(&self, expression: &str, now: NaiveDateTime) -> Option<NaiveDateTime>;
}

/// Small rule based parser covering the phrases people actually type:
///
/// - `in 3 hours`, `in an hour and 30 minutes`, `in 2d 4h`
/// - `3 hours from now`
/// - `tomorrow`, `tomorrow at 5pm`, `today at 17:30`, `9:15am tomorrow`
/// - `at 5pm`, `noon`, `midnight`
/// - `2024-01-01 13:00`, `2024-01-01T13:00:00`, `2024-01-01`
#[derive(Debug, Default, Clone)]
pub struct SimpleTimeParser;

const ABSOLUTE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dt%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dt%H:%M",
];

impl TimeExpressionParser for SimpleTimeParser {
    fn parse(&self, expression: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let normalized = expression.trim().to_lowercase().replace(',', " ");
        let tokens = normalized.split_whitespace().collect::<Vec<_>>();
        if tokens.is_empty() {
            return None;
        }

        parse_absolute(&tokens.join(" "))
            .or_else(|| parse_relative(&tokens, now))
            .or_else(|| parse_anchored(&tokens, now))
    }
}

fn parse_absolute(expression: &str) -> Option<NaiveDateTime> {
    for format in ABSOLUTE_FORMATS.iter() {
        if let Ok(dt) = NaiveDateTime::parse_from_str(expression, format) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(expression, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

fn parse_relative(tokens: &[&str], now: NaiveDateTime) -> Option<NaiveDateTime> {
    let duration = match tokens {
        ["in", rest @ ..] => parse_duration(rest)?,
        [rest @ .., "from", "now"] => parse_duration(rest)?,
        _ => return None,
    };
    now.checked_add_signed(duration)
}

fn parse_anchored(tokens: &[&str], now: NaiveDateTime) -> Option<NaiveDateTime> {
    let (day_offset, rest) = match tokens {
        ["today", rest @ ..] => (Some(0), rest),
        ["tomorrow", rest @ ..] => (Some(1), rest),
        [rest @ .., "today"] => (Some(0), rest),
        [rest @ .., "tomorrow"] => (Some(1), rest),
        rest => (None, rest),
    };
    let (explicit_at, rest) = match rest {
        ["at", rest @ ..] => (true, rest),
        rest => (false, rest),
    };

    match day_offset {
        Some(offset) => {
            let date = now.date().checked_add_signed(Duration::try_days(offset)?)?;
            if rest.is_empty() {
                // A bare "tomorrow" keeps the current wall clock time
                return if offset == 0 || explicit_at {
                    None
                } else {
                    Some(date.and_time(now.time()))
                };
            }
            Some(date.and_time(parse_time_of_day(rest)?))
        }
        None => {
            let joined = rest.join("");
            let looks_like_time = explicit_at
                || joined.contains(':')
                || joined.ends_with("am")
                || joined.ends_with("pm")
                || joined == "noon"
                || joined == "midnight";
            if !looks_like_time {
                return None;
            }
            Some(now.date().and_time(parse_time_of_day(rest)?))
        }
    }
}

fn parse_duration(tokens: &[&str]) -> Option<Duration> {
    let mut total = Duration::zero();
    let mut matched = false;
    let mut i = 0;

    while i < tokens.len() {
        let token = tokens[i];
        if token == "and" {
            i += 1;
            continue;
        }
        if let Some(duration) = parse_compact_duration(token) {
            total = total.checked_add(&duration)?;
            matched = true;
            i += 1;
            continue;
        }
        let amount = parse_amount(token)?;
        let unit = tokens.get(i + 1)?;
        total = total.checked_add(&unit_duration(unit, amount)?)?;
        matched = true;
        i += 2;
    }

    if matched {
        Some(total)
    } else {
        None
    }
}

/// `3h`, `30min`, `2d`
fn parse_compact_duration(token: &str) -> Option<Duration> {
    let split = token.find(|c: char| !c.is_ascii_digit())?;
    if split == 0 {
        return None;
    }
    let (amount, unit) = token.split_at(split);
    unit_duration(unit, amount.parse().ok()?)
}

fn parse_amount(token: &str) -> Option<i64> {
    match token {
        "a" | "an" | "one" => Some(1),
        _ => token.parse::<u32>().ok().map(i64::from),
    }
}

/// `None` for unknown units and amounts too large to represent
fn unit_duration(unit: &str, amount: i64) -> Option<Duration> {
    match unit {
        "s" | "sec" | "secs" | "second" | "seconds" => Duration::try_seconds(amount),
        "m" | "min" | "mins" | "minute" | "minutes" => Duration::try_minutes(amount),
        "h" | "hr" | "hrs" | "hour" | "hours" => Duration::try_hours(amount),
        "d" | "day" | "days" => Duration::try_days(amount),
        "w" | "week" | "weeks" => Duration::try_weeks(amount),
        _ => None,
    }
}

fn parse_time_of_day(tokens: &[&str]) -> Option<NaiveTime> {
    let joined = tokens.join("");
    match joined.as_str() {
        "noon" => return NaiveTime::from_hms_opt(12, 0, 0),
        "midnight" => return NaiveTime::from_hms_opt(0, 0, 0),
        _ => {}
    }

    let (clock, pm) = if let Some(clock) = joined.strip_suffix("am") {
        (clock, Some(false))
    } else if let Some(clock) = joined.strip_suffix("pm") {
        (clock, Some(true))
    } else {
        (joined.as_str(), None)
    };

    let mut parts = clock.split(':');
    let hour = parts.next()?.parse::<u32>().ok()?;
    let minute = match parts.next() {
        Some(minute) => minute.parse::<u32>().ok()?,
        None => 0,
    };
    let second = match parts.next() {
        Some(second) => second.parse::<u32>().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let hour = match pm {
        Some(pm) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            match (hour, pm) {
                (12, false) => 0,
                (12, true) => 12,
                (hour, false) => hour,
                (hour, true) => hour + 12,
            }
        }
        None => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, second)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(2, 0, 0)
            .unwrap()
    }

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn parse(expression: &str) -> Option<NaiveDateTime> {
        SimpleTimeParser.parse(expression, now())
    }

    #[test]
    fn it_parses_relative_expressions() {
        assert_eq!(parse("in 3 hours"), Some(dt(2024, 1, 1, 5, 0, 0)));
        assert_eq!(parse("In 3 Hours"), Some(dt(2024, 1, 1, 5, 0, 0)));
        assert_eq!(parse("in an hour"), Some(dt(2024, 1, 1, 3, 0, 0)));
        assert_eq!(parse("in 1 minute"), Some(dt(2024, 1, 1, 2, 1, 0)));
        assert_eq!(
            parse("in 1 hour and 30 minutes"),
            Some(dt(2024, 1, 1, 3, 30, 0))
        );
        assert_eq!(parse("in 2d 4h"), Some(dt(2024, 1, 3, 6, 0, 0)));
        assert_eq!(parse("in 2 weeks"), Some(dt(2024, 1, 15, 2, 0, 0)));
        assert_eq!(parse("45 seconds from now"), Some(dt(2024, 1, 1, 2, 0, 45)));
    }

    #[test]
    fn it_parses_day_anchors() {
        assert_eq!(parse("tomorrow"), Some(dt(2024, 1, 2, 2, 0, 0)));
        assert_eq!(parse("tomorrow at 5pm"), Some(dt(2024, 1, 2, 17, 0, 0)));
        assert_eq!(parse("tomorrow at 12am"), Some(dt(2024, 1, 2, 0, 0, 0)));
        assert_eq!(parse("today at 17:30"), Some(dt(2024, 1, 1, 17, 30, 0)));
        assert_eq!(parse("9:15 am tomorrow"), Some(dt(2024, 1, 2, 9, 15, 0)));
        assert_eq!(parse("tomorrow at noon"), Some(dt(2024, 1, 2, 12, 0, 0)));
    }

    #[test]
    fn it_parses_times_of_day() {
        assert_eq!(parse("at 5pm"), Some(dt(2024, 1, 1, 17, 0, 0)));
        assert_eq!(parse("at 17"), Some(dt(2024, 1, 1, 17, 0, 0)));
        assert_eq!(parse("5:45:10pm"), Some(dt(2024, 1, 1, 17, 45, 10)));
        assert_eq!(parse("midnight"), Some(dt(2024, 1, 1, 0, 0, 0)));
    }

    #[test]
    fn it_parses_absolute_datetimes() {
        assert_eq!(parse("2024-03-10 13:00"), Some(dt(2024, 3, 10, 13, 0, 0)));
        assert_eq!(
            parse("2024-03-10T13:00:05"),
            Some(dt(2024, 3, 10, 13, 0, 5))
        );
        assert_eq!(parse("2024-03-10"), Some(dt(2024, 3, 10, 0, 0, 0)));
    }

    #[test]
    fn it_rejects_garbage() {
        let invalid = vec![
            "",
            "whenever",
            "in",
            "in 3",
            "in 3 fortnights",
            "today",
            "at 13pm",
            "at 25:00",
            "17",
            "2024-02-30",
            "tomorrow at",
            "in 99999999999w",
            "in 9223372036854775807s",
            "in 4294967295 weeks 4294967295 weeks 4294967295 weeks 4294967295 weeks",
        ];
        for expression in invalid {
            assert_eq!(parse(expression), None, "{} should not parse", expression);
        }
    }
}
