use std::path::Path;

use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};

use crate::error::Result;
use crate::flatten::{CellValue, SheetTable, WorkbookData};
use crate::io::ensure_parent_dir;

/// Writes the provided workbook data to the given path, creating parent
/// directories as needed.
pub fn write_workbook(path: &Path, workbook: &WorkbookData) -> Result<()> {
    let mut workbook_writer = Workbook::new();

    for table in &workbook.tables {
        let worksheet = workbook_writer.add_worksheet();
        worksheet.set_name(table.sheet_name())?;
        write_table(worksheet, table)?;
    }

    ensure_parent_dir(path)?;
    workbook_writer.save(path)?;
    Ok(())
}

fn write_table(worksheet: &mut Worksheet, table: &SheetTable) -> Result<()> {
    let layout = &table.layout;
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(layout.header_font))
        .set_background_color(Color::RGB(layout.header_fill))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);

    for (col_idx, column) in layout.columns.iter().enumerate() {
        let col = col_idx as u16;
        worksheet.write_string_with_format(0, col, column.header, &header_format)?;
        worksheet.set_column_width(col, column.width)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = col_idx as u16;
            match cell {
                CellValue::Empty => {}
                CellValue::Text(value) => {
                    worksheet.write_string(row_num, col, value)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number(row_num, col, *value)?;
                }
            }
        }
    }

    let col_end = (layout.columns.len() as u16).saturating_sub(1);
    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofilter(0, 0, table.rows.len() as u32, col_end)?;
    Ok(())
}
