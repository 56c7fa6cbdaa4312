//! Timestamp construction and formatting. Timestamps are epoch milliseconds
//! (`NaN` for an invalid date) and are always read in UTC.

use crate::value::{Hint, Value};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use regex::Regex;
use std::sync::OnceLock;

const MAX_TIME: f64 = 8.64e15;
const INVALID: &str = "Invalid Date";

fn iso_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^([+-]\d{6}|\d{4})(?:-(\d{2})(?:-(\d{2}))?)?(?:[T ](\d{2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?(Z|[+-]\d{2}:\d{2})?)?$",
        )
        .expect("static ISO date pattern")
    })
}

/// Clamps to the representable range and drops sub-millisecond precision.
pub fn time_clip(ms: f64) -> f64 {
    if !ms.is_finite() || ms.abs() > MAX_TIME {
        return f64::NAN;
    }
    let ms = ms.trunc() + 0.0;
    // chrono stops at year 262143, short of the +-8.64e15 ms range.
    if to_datetime(ms).is_none() {
        return f64::NAN;
    }
    ms
}

/// Builds a timestamp from a value: numbers are epoch milliseconds, strings
/// are parsed, timestamps are copied.
pub fn to_timestamp(value: &Value) -> f64 {
    match value {
        Value::Date(ms) => *ms,
        Value::String(s) => parse(s),
        Value::Undefined => f64::NAN,
        Value::Array(_) | Value::Object(_) => match value.to_primitive(Hint::Default) {
            Value::String(s) => parse(&s),
            other => time_clip(other.to_number()),
        },
        other => time_clip(other.to_number()),
    }
}

/// Parses ISO-8601 (date-only, date-time with optional offset) first and
/// RFC 2822 / a few slash-separated layouts second. Anything else is `NaN`.
pub fn parse(input: &str) -> f64 {
    let s = input.trim();
    if let Some(ms) = parse_iso(s) {
        return time_clip(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return time_clip(dt.timestamp_millis() as f64);
    }
    for layout in ["%Y/%m/%d %H:%M:%S", "%Y/%m/%d %H:%M", "%m/%d/%Y %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, layout) {
            return time_clip(dt.and_utc().timestamp_millis() as f64);
        }
    }
    for layout in ["%Y/%m/%d", "%m/%d/%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return time_clip(dt.and_utc().timestamp_millis() as f64);
            }
        }
    }
    f64::NAN
}

fn parse_iso(s: &str) -> Option<f64> {
    let caps = iso_regex().captures(s)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        caps.get(i).map_or(Some(default), |m| m.as_str().parse().ok())
    };
    let year: i32 = caps.get(1)?.as_str().parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(2, 1)?, num(3, 1)?)?;
    let millis = caps.get(7).map_or(Some(0), |m| {
        let frac = m.as_str();
        let padded: String = frac.chars().chain(std::iter::repeat('0')).take(3).collect();
        padded.parse::<u32>().ok()
    })?;
    let naive = date.and_hms_milli_opt(num(4, 0)?, num(5, 0)?, num(6, 0)?, millis)?;
    let mut ms = naive.and_utc().timestamp_millis() as f64;
    if let Some(offset) = caps.get(8).map(|m| m.as_str()).filter(|o| *o != "Z") {
        let sign = if offset.starts_with('-') { -1.0 } else { 1.0 };
        let hours: f64 = offset[1..3].parse().ok()?;
        let minutes: f64 = offset[4..6].parse().ok()?;
        ms -= sign * (hours * 3_600_000.0 + minutes * 60_000.0);
    }
    Some(ms)
}

pub fn to_datetime(ms: f64) -> Option<DateTime<Utc>> {
    if ms.is_nan() {
        return None;
    }
    DateTime::from_timestamp_millis(ms as i64)
}

fn format_with(ms: f64, layout: &str) -> Option<String> {
    to_datetime(ms).map(|dt| dt.format(layout).to_string())
}

/// `2022-01-01T00:00:00.000Z`
pub fn to_iso_string(ms: f64) -> Option<String> {
    format_with(ms, "%Y-%m-%dT%H:%M:%S%.3fZ")
}

/// `Sat, 01 Jan 2022 00:00:00 GMT`
pub fn to_utc_string(ms: f64) -> String {
    format_with(ms, "%a, %d %b %Y %H:%M:%S GMT").unwrap_or_else(|| INVALID.to_string())
}

/// `Sat Jan 01 2022 00:00:00 GMT+0000 (Coordinated Universal Time)`
pub fn to_long_string(ms: f64) -> String {
    format_with(ms, "%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
        .unwrap_or_else(|| INVALID.to_string())
}

pub fn to_date_string(ms: f64) -> String {
    format_with(ms, "%Y-%m-%d").unwrap_or_else(|| INVALID.to_string())
}

pub fn to_time_string(ms: f64) -> String {
    format_with(ms, "%H:%M:%S").unwrap_or_else(|| INVALID.to_string())
}

/// A calendar or clock field of a timestamp.
#[derive(Clone, Copy, Debug)]
pub enum Component {
    Year,
    /// Zero-based.
    Month,
    DayOfMonth,
    /// 0 = Sunday.
    Weekday,
    Hours,
    Minutes,
    Seconds,
}

pub fn component(ms: f64, which: Component) -> f64 {
    let Some(dt) = to_datetime(ms) else {
        return f64::NAN;
    };
    let n = match which {
        Component::Year => return f64::from(dt.year()),
        Component::Month => dt.month0(),
        Component::DayOfMonth => dt.day(),
        Component::Weekday => dt.weekday().num_days_from_sunday(),
        Component::Hours => dt.hour(),
        Component::Minutes => dt.minute(),
        Component::Seconds => dt.second(),
    };
    f64::from(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_date_only_as_utc_midnight() {
        assert_eq!(parse("2022-01-01"), 1_640_995_200_000.0);
        assert_eq!(parse("2022-01-02") - parse("2022-01-01"), 86_400_000.0);
    }

    #[test]
    fn honours_offsets_and_fractions() {
        assert_eq!(parse("2022-01-01T01:00:00+01:00"), 1_640_995_200_000.0);
        assert_eq!(parse("2022-01-01T00:00:00.5Z"), 1_640_995_200_500.0);
        assert_eq!(parse("2022-01-01T00:00"), 1_640_995_200_000.0);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("not a date").is_nan());
        assert!(parse("2022-13-01").is_nan());
        assert!(to_timestamp(&Value::Undefined).is_nan());
        assert_eq!(to_timestamp(&Value::Null), 0.0);
    }

    #[test]
    fn clips_to_the_formattable_range() {
        assert!(time_clip(8.64e15).is_nan());
        assert!(time_clip(-8.64e15).is_nan());
        assert_eq!(time_clip(8e15), 8e15);
        assert!(to_iso_string(time_clip(8e15)).is_some());
        assert_eq!(time_clip(1.9), 1.0);
    }

    #[test]
    fn formats() {
        let ms = parse("2022-01-01");
        assert_eq!(to_iso_string(ms).as_deref(), Some("2022-01-01T00:00:00.000Z"));
        assert_eq!(to_utc_string(ms), "Sat, 01 Jan 2022 00:00:00 GMT");
        assert_eq!(to_time_string(ms + 3_723_000.0), "01:02:03");
        assert_eq!(to_utc_string(f64::NAN), "Invalid Date");
    }

    #[test]
    fn components() {
        let ms = parse("2022-03-15T10:20:30Z");
        assert_eq!(component(ms, Component::Year), 2022.0);
        assert_eq!(component(ms, Component::Month), 2.0);
        assert_eq!(component(ms, Component::DayOfMonth), 15.0);
        assert_eq!(component(ms, Component::Weekday), 2.0);
        assert_eq!(component(ms, Component::Seconds), 30.0);
    }
}
