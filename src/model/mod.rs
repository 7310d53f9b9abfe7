//! Records held by the agenda store and the inputs used to create or change them.

pub mod time;

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::ToolError;

/// Store-assigned identifier. Identifiers increase monotonically and are never reused.
pub type RecordId = i64;

/// A person in the address book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub id: RecordId,
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Field values for a contact that does not exist yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    pub name: String,
    pub surname: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub notes: String,
}

impl NewContact {
    /// Creates a contact with only a name; every other field is empty.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Partial update for a contact. Only fields set to `Some` are written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPatch {
    pub name: Option<String>,
    pub surname: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

impl ContactPatch {
    /// A patch that overwrites every field with the given values.
    pub fn replace_all(contact: NewContact) -> Self {
        Self {
            name: Some(contact.name),
            surname: Some(contact.surname),
            phone: Some(contact.phone),
            email: Some(contact.email),
            address: Some(contact.address),
            notes: Some(contact.notes),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column name and new value for every supplied field, in schema order.
    pub(crate) fn assignments(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("surname", &self.surname),
            ("phone", &self.phone),
            ("email", &self.email),
            ("address", &self.address),
            ("notes", &self.notes),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|value| (column, value)))
        .collect()
    }
}

/// A scheduled appointment.
///
/// `contact_name` and `contact_surname` come from a left join on the referenced
/// contact and are `None` when the event has no contact or the contact is gone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub contact_id: Option<RecordId>,
    /// Minutes of advance notice; zero means no reminder.
    pub reminder_minutes: u32,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    pub contact_name: Option<String>,
    pub contact_surname: Option<String>,
}

/// Field values for an event that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub location: String,
    pub contact_id: Option<RecordId>,
    pub reminder_minutes: u32,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, start: NaiveDateTime) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start,
            end: None,
            location: String::new(),
            contact_id: None,
            reminder_minutes: 0,
        }
    }
}

/// Task urgency. Declaration order is the listing order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = ToolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ToolError::InvalidPriority(trimmed.to_string()))
    }
}

/// A to-do item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub created_at: NaiveDateTime,
    /// Set when the task becomes complete, cleared when it is reopened.
    pub completed_at: Option<NaiveDateTime>,
}

/// Field values for a task that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            due_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_parses_case_insensitively() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert_eq!(" LOW ".parse::<Priority>().unwrap(), Priority::Low);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(ToolError::InvalidPriority(value)) if value == "urgent"
        ));
    }

    #[test]
    fn empty_patch_has_no_assignments() {
        assert!(ContactPatch::default().is_empty());

        let patch = ContactPatch {
            email: Some("ana@example.com".into()),
            ..ContactPatch::default()
        };
        assert_eq!(patch.assignments(), vec![("email", "ana@example.com")]);
    }
}
