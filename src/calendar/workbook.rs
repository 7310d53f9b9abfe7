use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use tracing::{debug, info, instrument};

use super::{MONTH_NAMES, WEEKDAY_NAMES, month_grid};
use crate::error::Result;
use crate::io::ensure_parent_dir;

/// Default file name for the generated calendar.
pub const DEFAULT_OUTPUT: &str = "Calendar_2026.xlsx";

const HEADER_FILL: u32 = 0x4472C4;
const WEEKEND_FILL: u32 = 0xE7E6E6;
const TITLE_ROW_HEIGHT: f64 = 30.0;
const WEEK_ROW_HEIGHT: f64 = 25.0;
const COLUMN_WIDTH: f64 = 15.0;

struct CalendarFormats {
    title: Format,
    header: Format,
    day: Format,
    weekend: Format,
    empty: Format,
}

impl CalendarFormats {
    fn new() -> Self {
        let day = Format::new()
            .set_font_size(11)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin);
        Self {
            title: Format::new()
                .set_bold()
                .set_font_size(14)
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter),
            header: Format::new()
                .set_bold()
                .set_font_size(12)
                .set_font_color(Color::White)
                .set_background_color(Color::RGB(HEADER_FILL))
                .set_align(FormatAlign::Center)
                .set_align(FormatAlign::VerticalCenter)
                .set_border(FormatBorder::Thin),
            weekend: day.clone().set_background_color(Color::RGB(WEEKEND_FILL)),
            day,
            empty: Format::new().set_border(FormatBorder::Thin),
        }
    }
}

/// Writes a workbook with one sheet per month of `year`.
#[instrument(level = "info", skip(path), fields(path = %path.display()))]
pub fn write_calendar_workbook(path: &Path, year: i32) -> Result<()> {
    let mut workbook = Workbook::new();
    let formats = CalendarFormats::new();

    for (idx, name) in MONTH_NAMES.iter().enumerate() {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name)?;
        write_month(worksheet, &formats, year, idx as u32 + 1)?;
    }

    ensure_parent_dir(path)?;
    workbook.save(path)?;
    info!("calendar written");
    Ok(())
}

fn write_month(
    worksheet: &mut Worksheet,
    formats: &CalendarFormats,
    year: i32,
    month: u32,
) -> Result<()> {
    let title = format!("{} {year}", MONTH_NAMES[(month - 1) as usize]);
    worksheet.merge_range(0, 0, 0, 6, &title, &formats.title)?;

    for (col, weekday) in WEEKDAY_NAMES.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *weekday, &formats.header)?;
        worksheet.set_column_width(col as u16, COLUMN_WIDTH)?;
    }

    let weeks = month_grid(year, month);
    for (row, height) in row_heights(weeks.len()) {
        worksheet.set_row_height(row, height)?;
    }
    for (week_idx, week) in weeks.iter().enumerate() {
        let row = week_idx as u32 + 2;
        for (col, day) in week.iter().enumerate() {
            let col_num = col as u16;
            match day {
                Some(day) => {
                    let format = if col >= 5 {
                        &formats.weekend
                    } else {
                        &formats.day
                    };
                    worksheet.write_number_with_format(row, col_num, f64::from(*day), format)?;
                }
                None => {
                    worksheet.write_blank(row, col_num, &formats.empty)?;
                }
            }
        }
    }
    debug!(month, weeks = weeks.len(), "month sheet written");
    Ok(())
}

/// Height of every row of a month sheet: the title row, then the weekday
/// header and each week row.
fn row_heights(week_count: usize) -> impl Iterator<Item = (u32, f64)> {
    std::iter::once((0, TITLE_ROW_HEIGHT))
        .chain((1..week_count as u32 + 2).map(|row| (row, WEEK_ROW_HEIGHT)))
}
