//! Month-by-month calendar layout for a single year.
//!
//! Weeks start on Monday. Saturdays and Sundays are weekends, and the 2026
//! Argentine national holidays are flagged on top of that.

pub mod terminal;
pub mod workbook;

use chrono::{Datelike, NaiveDate};

/// The year the generators render by default.
pub const CALENDAR_YEAR: i32 = 2026;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

/// A public holiday on a fixed day of the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub month: u32,
    pub day: u32,
    pub name: &'static str,
}

const fn holiday(month: u32, day: u32, name: &'static str) -> Holiday {
    Holiday { month, day, name }
}

const ARGENTINA_2026: &[Holiday] = &[
    holiday(1, 1, "New Year's Day"),
    holiday(2, 23, "Carnival"),
    holiday(2, 24, "Carnival"),
    holiday(3, 24, "Day of Remembrance for Truth and Justice"),
    holiday(4, 2, "Malvinas Veterans and Fallen Day"),
    holiday(4, 9, "Maundy Thursday"),
    holiday(4, 10, "Good Friday"),
    holiday(5, 1, "Labour Day"),
    holiday(5, 25, "May Revolution Day"),
    holiday(6, 20, "Flag Day"),
    holiday(7, 9, "Independence Day"),
    holiday(8, 17, "Anniversary of the Death of San Martín"),
    holiday(10, 12, "Day of Respect for Cultural Diversity"),
    holiday(11, 2, "All Souls' Day"),
    holiday(12, 8, "Immaculate Conception"),
    holiday(12, 25, "Christmas Day"),
];

/// National holidays known for `year`; empty for years without a table.
pub fn holidays(year: i32) -> &'static [Holiday] {
    if year == CALENDAR_YEAR {
        ARGENTINA_2026
    } else {
        &[]
    }
}

pub fn is_holiday(year: i32, month: u32, day: u32) -> bool {
    holidays(year)
        .iter()
        .any(|holiday| holiday.month == month && holiday.day == day)
}

/// How a day is highlighted. Holidays win over weekends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Weekday,
    Weekend,
    Holiday,
}

/// Classifies a date; `None` when the date does not exist.
pub fn day_kind(year: i32, month: u32, day: u32) -> Option<DayKind> {
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(if is_holiday(year, month, day) {
        DayKind::Holiday
    } else if date.weekday().num_days_from_monday() >= 5 {
        DayKind::Weekend
    } else {
        DayKind::Weekday
    })
}

/// Monday-first week with `None` for days outside the month.
pub type Week = [Option<u32>; 7];

/// Weeks of `month` (1-12). Returns no weeks for an invalid month.
pub fn month_grid(year: i32, month: u32) -> Vec<Week> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let days = days_in_month(first);
    let offset = first.weekday().num_days_from_monday() as usize;

    let mut weeks = Vec::new();
    let mut week: Week = [None; 7];
    let mut column = offset;
    for day in 1..=days {
        week[column] = Some(day);
        column += 1;
        if column == 7 {
            weeks.push(week);
            week = [None; 7];
            column = 0;
        }
    }
    if column > 0 {
        weeks.push(week);
    }
    weeks
}

fn days_in_month(first: NaiveDate) -> u32 {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.and_then(|next| next.pred_opt())
        .map_or(28, |last| last.day())
}

pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("")
}
