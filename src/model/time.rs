//! Text representations of the timestamps the agenda stores and exchanges.
//!
//! Every representation sorts lexically in chronological order, which is what
//! the store relies on for `ORDER BY` and `BETWEEN` over text columns.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Event start and end times, minute precision.
pub const MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";
/// Audit timestamps such as `created_at`.
pub const SECOND_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Task due dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const ACCEPTED_DATETIME_FORMATS: &[&str] = &[
    MINUTE_FORMAT,
    SECOND_FORMAT,
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Formats an event time, dropping anything below the minute.
pub fn format_minute(value: NaiveDateTime) -> String {
    value.format(MINUTE_FORMAT).to_string()
}

/// Formats an audit timestamp.
pub fn format_second(value: NaiveDateTime) -> String {
    value.format(SECOND_FORMAT).to_string()
}

pub fn format_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a timestamp typed by a user or found in a spreadsheet cell.
///
/// Accepts `YYYY-MM-DD HH:MM`, optional seconds, an ISO `T` separator, or a bare
/// date (midnight). The result is truncated to the minute.
pub fn parse_event_time(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    ACCEPTED_DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .or_else(|| parse_date(trimmed).map(|date| date.and_time(NaiveTime::MIN)))
        .and_then(truncate_to_minute)
}

/// Parses a `YYYY-MM-DD` date, also accepting a full timestamp and keeping its date.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok().or_else(|| {
        ACCEPTED_DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
            .map(|value| value.date())
    })
}

/// Parses a stored audit timestamp.
pub fn parse_stored_timestamp(input: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(input, SECOND_FORMAT)
        .ok()
        .or_else(|| parse_event_time(input))
}

/// Converts a spreadsheet date serial (days since 1899-12-30, fraction of day as
/// time) into a timestamp truncated to the minute.
pub fn from_spreadsheet_serial(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial < 0.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let seconds = (serial * 86_400.0).round() as i64;
    epoch
        .checked_add_signed(Duration::seconds(seconds))
        .and_then(truncate_to_minute)
}

/// Current local wall-clock time at second precision.
pub fn now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

fn truncate_to_minute(value: NaiveDateTime) -> Option<NaiveDateTime> {
    value.with_second(0)?.with_nanosecond(0)
}
