use chrono::{NaiveDate, NaiveDateTime};

use super::CellValue;
use crate::model::time::{format_date, format_minute, format_second};
use crate::model::{Contact, Event, NewContact, NewEvent, NewTask, Priority, RecordId, Task};

/// One data row of the Contacts sheet. Blank cells read as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRow {
    pub id: Option<RecordId>,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
}

impl ContactRow {
    pub fn into_cells(self) -> Vec<CellValue> {
        vec![
            self.id.map_or(CellValue::Empty, CellValue::id),
            CellValue::text(self.name),
            CellValue::text(self.surname),
            CellValue::text(self.phone),
            CellValue::text(self.email),
            CellValue::text(self.address),
            CellValue::text(self.notes),
        ]
    }

    /// The row's field values, without its identifier.
    pub fn to_new_contact(&self) -> NewContact {
        NewContact {
            name: self.name.clone(),
            surname: self.surname.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            notes: self.notes.clone(),
        }
    }
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        Self {
            id: Some(contact.id),
            name: contact.name.clone(),
            surname: contact.surname.clone(),
            phone: contact.phone.clone(),
            email: contact.email.clone(),
            address: contact.address.clone(),
            notes: contact.notes.clone(),
        }
    }
}

/// One data row of the Events sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventRow {
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub contact_id: Option<RecordId>,
    pub reminder_minutes: u32,
    pub completed: bool,
}

impl EventRow {
    pub fn into_cells(self) -> Vec<CellValue> {
        vec![
            self.id.map_or(CellValue::Empty, CellValue::id),
            CellValue::text(self.title),
            CellValue::text(self.description),
            CellValue::optional_text(self.start.map(format_minute)),
            CellValue::optional_text(self.end.map(format_minute)),
            CellValue::text(self.location),
            self.contact_id.map_or(CellValue::Empty, CellValue::id),
            CellValue::number(self.reminder_minutes),
            CellValue::flag(self.completed),
        ]
    }

    /// A new event built from the row, or `None` without a title or start time.
    pub fn to_new_event(&self) -> Option<NewEvent> {
        if self.title.is_empty() {
            return None;
        }
        let start = self.start?;
        Some(NewEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            start,
            end: self.end,
            location: self.location.clone(),
            contact_id: self.contact_id,
            reminder_minutes: self.reminder_minutes,
        })
    }
}

impl From<&Event> for EventRow {
    fn from(event: &Event) -> Self {
        Self {
            id: Some(event.id),
            title: event.title.clone(),
            description: event.description.clone(),
            start: Some(event.start),
            end: event.end,
            location: event.location.clone(),
            contact_id: event.contact_id,
            reminder_minutes: event.reminder_minutes,
            completed: event.completed,
        }
    }
}

/// One data row of the Tasks sheet. A blank priority reads as medium.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskRow {
    pub id: Option<RecordId>,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub completed_at: Option<NaiveDateTime>,
}

impl TaskRow {
    pub fn into_cells(self) -> Vec<CellValue> {
        vec![
            self.id.map_or(CellValue::Empty, CellValue::id),
            CellValue::text(self.title),
            CellValue::text(self.description),
            CellValue::text(self.priority.as_str()),
            CellValue::optional_text(self.due_date.map(format_date)),
            CellValue::flag(self.completed),
            CellValue::optional_text(self.completed_at.map(format_second)),
        ]
    }

    /// A new task built from the row, or `None` without a title.
    pub fn to_new_task(&self) -> Option<NewTask> {
        if self.title.is_empty() {
            return None;
        }
        Some(NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            priority: self.priority,
            due_date: self.due_date,
        })
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: Some(task.id),
            title: task.title.clone(),
            description: task.description.clone(),
            priority: task.priority,
            due_date: task.due_date,
            completed: task.completed,
            completed_at: task.completed_at,
        }
    }
}
