//! Flattening of agenda records into sheet tables and the typed row schema of
//! each sheet.
//!
//! The workbook has three sheets with fixed layouts. Each data row of a sheet
//! maps to one typed row ([`ContactRow`], [`EventRow`], [`TaskRow`]); the
//! reader binds columns by header text, so the headers declared here are the
//! contract between export and import.

mod rows;

pub use rows::{ContactRow, EventRow, TaskRow};

use crate::model::{Contact, Event, RecordId, Task};

/// Sheet holding one row per contact.
pub const CONTACTS_SHEET: &str = "Contacts";
/// Sheet holding one row per event.
pub const EVENTS_SHEET: &str = "Events";
/// Sheet holding one row per task.
pub const TASKS_SHEET: &str = "Tasks";

/// A header cell and the width of its column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

const fn column(header: &'static str, width: f64) -> Column {
    Column { header, width }
}

/// Fixed presentation of one sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: &'static str,
    pub columns: &'static [Column],
    /// Header background as `0xRRGGBB`.
    pub header_fill: u32,
    /// Header font colour as `0xRRGGBB`.
    pub header_font: u32,
}

impl SheetLayout {
    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|column| column.header)
    }
}

pub mod headers {
    pub const ID: &str = "ID";
    pub const NAME: &str = "Name";
    pub const SURNAME: &str = "Surname";
    pub const PHONE: &str = "Phone";
    pub const EMAIL: &str = "Email";
    pub const ADDRESS: &str = "Address";
    pub const NOTES: &str = "Notes";
    pub const TITLE: &str = "Title";
    pub const DESCRIPTION: &str = "Description";
    pub const START: &str = "Start";
    pub const END: &str = "End";
    pub const LOCATION: &str = "Location";
    pub const CONTACT_ID: &str = "Contact ID";
    pub const REMINDER: &str = "Reminder";
    pub const COMPLETED: &str = "Completed";
    pub const PRIORITY: &str = "Priority";
    pub const DUE_DATE: &str = "Due Date";
    pub const COMPLETED_AT: &str = "Completed At";
}

pub const CONTACTS_LAYOUT: SheetLayout = SheetLayout {
    sheet_name: CONTACTS_SHEET,
    columns: &[
        column(headers::ID, 8.0),
        column(headers::NAME, 20.0),
        column(headers::SURNAME, 20.0),
        column(headers::PHONE, 15.0),
        column(headers::EMAIL, 25.0),
        column(headers::ADDRESS, 30.0),
        column(headers::NOTES, 30.0),
    ],
    header_fill: 0x4472C4,
    header_font: 0xFFFFFF,
};

pub const EVENTS_LAYOUT: SheetLayout = SheetLayout {
    sheet_name: EVENTS_SHEET,
    columns: &[
        column(headers::ID, 8.0),
        column(headers::TITLE, 25.0),
        column(headers::DESCRIPTION, 35.0),
        column(headers::START, 18.0),
        column(headers::END, 18.0),
        column(headers::LOCATION, 20.0),
        column(headers::CONTACT_ID, 12.0),
        column(headers::REMINDER, 12.0),
        column(headers::COMPLETED, 12.0),
    ],
    header_fill: 0x70AD47,
    header_font: 0xFFFFFF,
};

pub const TASKS_LAYOUT: SheetLayout = SheetLayout {
    sheet_name: TASKS_SHEET,
    columns: &[
        column(headers::ID, 8.0),
        column(headers::TITLE, 30.0),
        column(headers::DESCRIPTION, 40.0),
        column(headers::PRIORITY, 12.0),
        column(headers::DUE_DATE, 18.0),
        column(headers::COMPLETED, 12.0),
        column(headers::COMPLETED_AT, 18.0),
    ],
    header_fill: 0xFFC000,
    header_font: 0x000000,
};

/// Columns written on export but never read back: imported events and tasks
/// always start incomplete.
pub const EXPORT_ONLY_HEADERS: [&str; 2] = [headers::COMPLETED, headers::COMPLETED_AT];

/// Sheet layouts in workbook order.
pub const LAYOUTS: [SheetLayout; 3] = [CONTACTS_LAYOUT, EVENTS_LAYOUT, TASKS_LAYOUT];

/// A single typed cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
}

impl CellValue {
    /// Text cell, or an empty cell for empty text.
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }

    pub fn optional_text(value: Option<String>) -> Self {
        value.map_or(CellValue::Empty, CellValue::text)
    }

    pub fn number(value: impl Into<f64>) -> Self {
        CellValue::Number(value.into())
    }

    pub fn id(value: RecordId) -> Self {
        CellValue::Number(value as f64)
    }

    pub fn flag(value: bool) -> Self {
        CellValue::Number(if value { 1.0 } else { 0.0 })
    }
}

/// A table that will be materialised as an Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub layout: SheetLayout,
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetTable {
    pub fn empty(layout: SheetLayout) -> Self {
        Self {
            layout,
            rows: Vec::new(),
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        self.layout.sheet_name
    }
}

/// Represents all tables required to materialise the Excel workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookData {
    pub tables: Vec<SheetTable>,
}

impl WorkbookData {
    pub fn table(&self, sheet_name: &str) -> Option<&SheetTable> {
        self.tables
            .iter()
            .find(|table| table.sheet_name() == sheet_name)
    }
}

/// The three sheets with header rows only.
pub fn template_workbook() -> WorkbookData {
    WorkbookData {
        tables: LAYOUTS.into_iter().map(SheetTable::empty).collect(),
    }
}

/// Flattens records into the three sheets, one row per record, in the order given.
pub fn build_workbook(contacts: &[Contact], events: &[Event], tasks: &[Task]) -> WorkbookData {
    WorkbookData {
        tables: vec![
            SheetTable {
                layout: CONTACTS_LAYOUT,
                rows: contacts
                    .iter()
                    .map(|contact| ContactRow::from(contact).into_cells())
                    .collect(),
            },
            SheetTable {
                layout: EVENTS_LAYOUT,
                rows: events
                    .iter()
                    .map(|event| EventRow::from(event).into_cells())
                    .collect(),
            },
            SheetTable {
                layout: TASKS_LAYOUT,
                rows: tasks
                    .iter()
                    .map(|task| TaskRow::from(task).into_cells())
                    .collect(),
            },
        ],
    }
}
