use std::collections::HashMap;
use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{Result, ToolError};
use crate::flatten::{
    CONTACTS_LAYOUT, ContactRow, EVENTS_LAYOUT, EXPORT_ONLY_HEADERS, EventRow, SheetLayout,
    TASKS_LAYOUT, TaskRow, headers,
};
use crate::model::time::{from_spreadsheet_serial, parse_date, parse_event_time};
use crate::model::{Priority, RecordId};

/// How one data row takes part in an import.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetRow<T> {
    /// Every cell the import uses was present and valid.
    Complete(T),
    /// An event or task row carrying an identifier, as shown in the sheet.
    /// Its other cells are not read.
    Identified(String),
    /// A row without a name or title, or an event row without a start.
    Incomplete,
}

/// Rows of every agenda sheet found in a workbook. A sheet missing from the
/// workbook is `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgendaSheets {
    pub contacts: Option<Vec<SheetRow<ContactRow>>>,
    pub events: Option<Vec<SheetRow<EventRow>>>,
    pub tasks: Option<Vec<SheetRow<TaskRow>>>,
}

/// Reads and validates the agenda sheets of a workbook following the
/// conventions produced by the [`excel_write`](crate::io::excel_write) module.
///
/// Columns are located by header text, so they may be reordered or
/// interleaved with extra columns. Only the cells of rows that an import would
/// apply are type-checked, and every such row is parsed before returning.
pub fn read_agenda(path: &Path) -> Result<AgendaSheets> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let contacts = read_optional_sheet(&mut workbook, &CONTACTS_LAYOUT)?
        .map(|range| parse_sheet(&range, &CONTACTS_LAYOUT, contact_row))
        .transpose()?;
    let events = read_optional_sheet(&mut workbook, &EVENTS_LAYOUT)?
        .map(|range| parse_sheet(&range, &EVENTS_LAYOUT, event_row))
        .transpose()?;
    let tasks = read_optional_sheet(&mut workbook, &TASKS_LAYOUT)?
        .map(|range| parse_sheet(&range, &TASKS_LAYOUT, task_row))
        .transpose()?;

    Ok(AgendaSheets {
        contacts,
        events,
        tasks,
    })
}

fn read_optional_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
    layout: &SheetLayout,
) -> Result<Option<Range<DataType>>> {
    workbook
        .worksheet_range(layout.sheet_name)
        .transpose()
        .map_err(ToolError::from)
}

fn parse_sheet<T>(
    range: &Range<DataType>,
    layout: &SheetLayout,
    parse_row: fn(&RowReader<'_>) -> Result<SheetRow<T>>,
) -> Result<Vec<SheetRow<T>>> {
    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let binding = ColumnBinding::bind(layout, header_row)?;
    let header_line = range.start().map_or(0, |(row, _)| row as usize);

    rows.enumerate()
        .filter(|(_, cells)| !cells.iter().all(is_blank))
        .map(|(offset, cells)| {
            parse_row(&RowReader {
                binding: &binding,
                cells,
                row_number: header_line + offset + 2,
            })
        })
        .collect()
}

/// Position of every imported header within a sheet's header row. Export-only
/// columns are neither required nor bound.
#[derive(Debug)]
struct ColumnBinding {
    sheet: &'static str,
    positions: HashMap<&'static str, usize>,
}

impl ColumnBinding {
    fn bind(layout: &SheetLayout, header_row: &[DataType]) -> Result<Self> {
        let found: Vec<String> = header_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)).trim().to_string())
            .collect();

        let mut positions = HashMap::new();
        for header in layout
            .headers()
            .filter(|header| !EXPORT_ONLY_HEADERS.contains(header))
        {
            let position = found
                .iter()
                .position(|candidate| candidate.eq_ignore_ascii_case(header))
                .ok_or_else(|| {
                    ToolError::InvalidWorkbook(format!(
                        "sheet '{}' is missing column '{header}'",
                        layout.sheet_name
                    ))
                })?;
            positions.insert(header, position);
        }

        Ok(Self {
            sheet: layout.sheet_name,
            positions,
        })
    }
}

/// Typed access to the cells of one data row.
struct RowReader<'a> {
    binding: &'a ColumnBinding,
    cells: &'a [DataType],
    /// 1-based, as shown by spreadsheet applications.
    row_number: usize,
}

impl RowReader<'_> {
    fn cell(&self, header: &str) -> Option<&DataType> {
        self.binding
            .positions
            .get(header)
            .and_then(|&position| self.cells.get(position))
    }

    fn invalid(&self, header: &str, cell: Option<&DataType>) -> ToolError {
        ToolError::InvalidCell {
            sheet: self.binding.sheet.to_string(),
            row: self.row_number,
            column: header.to_string(),
            value: cell_to_string(cell),
        }
    }

    fn text(&self, header: &str) -> String {
        cell_to_string(self.cell(header))
    }

    fn is_blank(&self, header: &str) -> bool {
        self.cell(header).is_none_or(is_blank)
    }

    /// Raw identifier text, or `None` for a blank or zero cell. Not validated.
    fn identifier_text(&self, header: &str) -> Option<String> {
        let raw = self.text(header).trim().to_string();
        let is_zero = raw.parse::<f64>().is_ok_and(|value| value == 0.0);
        (!raw.is_empty() && !is_zero).then_some(raw)
    }

    /// Record identifier; blank and zero both mean "no identifier".
    fn id(&self, header: &str) -> Result<Option<RecordId>> {
        let cell = self.cell(header);
        let parsed = match cell {
            None | Some(DataType::Empty) => Some(0),
            Some(DataType::Int(value)) => Some(*value),
            Some(DataType::Float(value)) if value.fract() == 0.0 => Some(*value as i64),
            Some(DataType::String(value)) if value.trim().is_empty() => Some(0),
            Some(DataType::String(value)) => value.trim().parse::<RecordId>().ok(),
            Some(_) => None,
        };
        match parsed {
            Some(0) => Ok(None),
            Some(id) if id > 0 => Ok(Some(id)),
            _ => Err(self.invalid(header, cell)),
        }
    }

    /// Non-negative whole number; blank reads as zero.
    fn count(&self, header: &str) -> Result<u32> {
        let cell = self.cell(header);
        let parsed = match cell {
            None | Some(DataType::Empty) => Some(0),
            Some(DataType::Int(value)) => u32::try_from(*value).ok(),
            Some(DataType::Float(value)) if value.fract() == 0.0 && *value >= 0.0 => {
                u32::try_from(*value as i64).ok()
            }
            Some(DataType::String(value)) if value.trim().is_empty() => Some(0),
            Some(DataType::String(value)) => value.trim().parse().ok(),
            Some(_) => None,
        };
        parsed.ok_or_else(|| self.invalid(header, cell))
    }

    fn timestamp(&self, header: &str) -> Result<Option<NaiveDateTime>> {
        let cell = self.cell(header);
        match cell {
            None | Some(DataType::Empty) => Ok(None),
            Some(DataType::DateTime(serial)) => from_spreadsheet_serial(*serial)
                .map(Some)
                .ok_or_else(|| self.invalid(header, cell)),
            Some(other) => {
                let raw = cell_to_string(Some(other));
                if raw.trim().is_empty() {
                    return Ok(None);
                }
                parse_event_time(&raw)
                    .map(Some)
                    .ok_or_else(|| self.invalid(header, cell))
            }
        }
    }

    fn date(&self, header: &str) -> Result<Option<NaiveDate>> {
        let cell = self.cell(header);
        match cell {
            None | Some(DataType::Empty) => Ok(None),
            Some(DataType::DateTime(serial)) => from_spreadsheet_serial(*serial)
                .map(|value| Some(value.date()))
                .ok_or_else(|| self.invalid(header, cell)),
            Some(other) => {
                let raw = cell_to_string(Some(other));
                if raw.trim().is_empty() {
                    return Ok(None);
                }
                parse_date(&raw)
                    .map(Some)
                    .ok_or_else(|| self.invalid(header, cell))
            }
        }
    }

    /// Task priority; blank reads as medium.
    fn priority(&self, header: &str) -> Result<Priority> {
        let raw = self.text(header);
        if raw.trim().is_empty() {
            return Ok(Priority::default());
        }
        raw.parse().map_err(|_| self.invalid(header, self.cell(header)))
    }
}

fn contact_row(row: &RowReader<'_>) -> Result<SheetRow<ContactRow>> {
    if row.is_blank(headers::NAME) {
        return Ok(SheetRow::Incomplete);
    }
    Ok(SheetRow::Complete(ContactRow {
        id: row.id(headers::ID)?,
        name: row.text(headers::NAME),
        surname: row.text(headers::SURNAME),
        phone: row.text(headers::PHONE),
        email: row.text(headers::EMAIL),
        address: row.text(headers::ADDRESS),
        notes: row.text(headers::NOTES),
    }))
}

fn event_row(row: &RowReader<'_>) -> Result<SheetRow<EventRow>> {
    if row.is_blank(headers::TITLE) || row.is_blank(headers::START) {
        return Ok(SheetRow::Incomplete);
    }
    if let Some(id) = row.identifier_text(headers::ID) {
        return Ok(SheetRow::Identified(id));
    }
    Ok(SheetRow::Complete(EventRow {
        id: None,
        title: row.text(headers::TITLE),
        description: row.text(headers::DESCRIPTION),
        start: row.timestamp(headers::START)?,
        end: row.timestamp(headers::END)?,
        location: row.text(headers::LOCATION),
        contact_id: row.id(headers::CONTACT_ID)?,
        reminder_minutes: row.count(headers::REMINDER)?,
        completed: false,
    }))
}

fn task_row(row: &RowReader<'_>) -> Result<SheetRow<TaskRow>> {
    if row.is_blank(headers::TITLE) {
        return Ok(SheetRow::Incomplete);
    }
    if let Some(id) = row.identifier_text(headers::ID) {
        return Ok(SheetRow::Identified(id));
    }
    Ok(SheetRow::Complete(TaskRow {
        id: None,
        title: row.text(headers::TITLE),
        description: row.text(headers::DESCRIPTION),
        priority: row.priority(headers::PRIORITY)?,
        due_date: row.date(headers::DUE_DATE)?,
        completed: false,
        completed_at: None,
    }))
}

fn is_blank(cell: &DataType) -> bool {
    match cell {
        DataType::Empty => true,
        DataType::String(value) => value.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
