use std::fmt::Write as _;

use owo_colors::OwoColorize;

use super::{DayKind, WEEKDAY_ABBREVIATIONS, day_kind, month_grid, month_name};

const EMPTY_CELL: &str = "  ";

/// Renders one month as a text grid: a `Month YYYY` title, the weekday
/// header, then one line per week with two-column day cells. With `colored`
/// set, holidays are red and weekends blue.
pub fn render_month(year: i32, month: u32, colored: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {year}", month_name(month));
    let _ = writeln!(out, "{}", WEEKDAY_ABBREVIATIONS.join(" "));

    for week in month_grid(year, month) {
        let cells: Vec<String> = week
            .iter()
            .map(|day| match day {
                Some(day) => day_cell(year, month, *day, colored),
                None => EMPTY_CELL.to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", cells.join(" ").trim_end());
    }
    out
}

/// All twelve months, separated by a blank line.
pub fn render_year(year: i32, colored: bool) -> String {
    (1..=12)
        .map(|month| render_month(year, month, colored))
        .collect::<Vec<_>>()
        .join("\n")
}

fn day_cell(year: i32, month: u32, day: u32, colored: bool) -> String {
    let text = format!("{day:>2}");
    if !colored {
        return text;
    }
    match day_kind(year, month, day) {
        Some(DayKind::Holiday) => text.red().to_string(),
        Some(DayKind::Weekend) => text.blue().to_string(),
        _ => text,
    }
}
