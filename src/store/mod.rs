//! SQLite persistence for contacts, events and tasks.
//!
//! [`AgendaStore`] owns a single connection that is opened on the first
//! operation and released by [`AgendaStore::close`]. Every mutation is a single
//! statement and is committed before the call returns.

pub mod schema;

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::unsync::OnceCell;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::error::{Result, ToolError};
use crate::io::ensure_parent_dir;
use crate::model::time::{self, format_date, format_minute, format_second};
use crate::model::{
    Contact, ContactPatch, Event, NewContact, NewEvent, NewTask, Priority, RecordId, Task,
};

/// Where the database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    File(PathBuf),
    Memory,
}

/// Durable CRUD over the three agenda record kinds.
pub struct AgendaStore {
    location: StoreLocation,
    conn: OnceCell<Connection>,
}

const CONTACT_COLUMNS: &str =
    "id, name, surname, phone, email, address, notes, created_at, updated_at";

const EVENT_SELECT: &str = r#"
SELECT e.id, e.title, e.description, e.start, e."end", e.location, e.contact_id,
       e.reminder_minutes, e.completed, e.created_at, c.name, c.surname
FROM events e
LEFT JOIN contacts c ON e.contact_id = c.id"#;

const TASK_COLUMNS: &str =
    "id, title, description, priority, due_date, completed, created_at, completed_at";

const TASK_ORDER: &str = "
ORDER BY completed,
         CASE priority WHEN 'High' THEN 1 WHEN 'Medium' THEN 2 WHEN 'Low' THEN 3 ELSE 4 END,
         due_date IS NULL,
         due_date,
         id";

impl AgendaStore {
    /// Creates a store backed by the database file at `path`. Nothing is opened yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_location(StoreLocation::File(path.into()))
    }

    /// Creates a store backed by a private in-memory database.
    pub fn in_memory() -> Self {
        Self::with_location(StoreLocation::Memory)
    }

    pub fn with_location(location: StoreLocation) -> Self {
        Self {
            location,
            conn: OnceCell::new(),
        }
    }

    pub fn location(&self) -> &StoreLocation {
        &self.location
    }

    /// Whether the connection has been opened and not yet closed.
    pub fn is_open(&self) -> bool {
        self.conn.get().is_some()
    }

    /// Releases the connection. A later operation reopens it.
    ///
    /// An in-memory database loses its contents when closed.
    pub fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close().map_err(|(_, err)| ToolError::from(err))?;
            debug!("database connection closed");
        }
        Ok(())
    }

    fn connection(&self) -> Result<&Connection> {
        self.conn.get_or_try_init(|| open_connection(&self.location))
    }

    // Contacts

    #[instrument(level = "debug", skip_all, fields(name = %contact.name))]
    pub fn add_contact(&self, contact: &NewContact) -> Result<RecordId> {
        let conn = self.connection()?;
        let now = format_second(time::now());
        conn.execute(
            "INSERT INTO contacts (name, surname, phone, email, address, notes, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
            params![
                contact.name,
                contact.surname,
                contact.phone,
                contact.email,
                contact.address,
                contact.notes,
                now,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists contacts ordered by name then surname.
    ///
    /// A non-empty `search` keeps contacts whose name, surname or email contains
    /// it, ignoring case.
    pub fn get_contacts(&self, search: Option<&str>) -> Result<Vec<Contact>> {
        let conn = self.connection()?;
        let term = search.filter(|term| !term.is_empty());
        let contacts = match term {
            Some(term) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts
                     WHERE instr(fold_case(name), ?1) > 0
                        OR instr(fold_case(surname), ?1) > 0
                        OR instr(fold_case(email), ?1) > 0
                     ORDER BY name, surname, id"
                ))?;
                stmt.query_map([term.to_lowercase()], contact_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY name, surname, id"
                ))?;
                stmt.query_map([], contact_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(contacts)
    }

    pub fn get_contact(&self, id: RecordId) -> Result<Option<Contact>> {
        let conn = self.connection()?;
        let contact = conn
            .query_row(
                &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"),
                [id],
                contact_from_row,
            )
            .optional()?;
        Ok(contact)
    }

    /// Writes the supplied fields of `patch` and refreshes `updated_at`.
    ///
    /// An empty patch performs no write. Returns the number of rows changed.
    #[instrument(level = "debug", skip(self, patch))]
    pub fn update_contact(&self, id: RecordId, patch: &ContactPatch) -> Result<usize> {
        let assignments = patch.assignments();
        if assignments.is_empty() {
            return Ok(0);
        }

        let mut set_clauses: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(idx, (column, _))| format!("{column} = ?{}", idx + 1))
            .collect();
        let updated_at = format_second(time::now());
        let mut values: Vec<&dyn rusqlite::ToSql> = assignments
            .iter()
            .map(|(_, value)| value as &dyn rusqlite::ToSql)
            .collect();
        set_clauses.push(format!("updated_at = ?{}", values.len() + 1));
        values.push(&updated_at);
        values.push(&id);

        let sql = format!(
            "UPDATE contacts SET {} WHERE id = ?{}",
            set_clauses.join(", "),
            values.len()
        );
        let changed = self.connection()?.execute(&sql, values.as_slice())?;
        if changed == 0 {
            debug!("no contact with this id");
        }
        Ok(changed)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_contact(&self, id: RecordId) -> Result<usize> {
        Ok(self
            .connection()?
            .execute("DELETE FROM contacts WHERE id = ?1", [id])?)
    }

    // Events

    #[instrument(level = "debug", skip_all, fields(title = %event.title))]
    pub fn add_event(&self, event: &NewEvent) -> Result<RecordId> {
        let conn = self.connection()?;
        conn.execute(
            r#"INSERT INTO events (title, description, start, "end", location, contact_id, reminder_minutes, created_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)"#,
            params![
                event.title,
                event.description,
                format_minute(event.start),
                event.end.map(format_minute),
                event.location,
                event.contact_id,
                event.reminder_minutes,
                format_second(time::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists events by start time, each joined with its contact's name.
    ///
    /// When both bounds are given only events starting within `[start, end]`
    /// (inclusive, minute precision) are returned.
    pub fn get_events(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<Vec<Event>> {
        let conn = self.connection()?;
        let events = match (start, end) {
            (Some(start), Some(end)) => {
                let mut stmt = conn.prepare(&format!(
                    "{EVENT_SELECT} WHERE e.start BETWEEN ?1 AND ?2 ORDER BY e.start, e.id"
                ))?;
                stmt.query_map(
                    params![format_minute(start), format_minute(end)],
                    event_from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?
            }
            _ => {
                let mut stmt = conn.prepare(&format!("{EVENT_SELECT} ORDER BY e.start, e.id"))?;
                stmt.query_map([], event_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(events)
    }

    pub fn get_event(&self, id: RecordId) -> Result<Option<Event>> {
        let event = self
            .connection()?
            .query_row(&format!("{EVENT_SELECT} WHERE e.id = ?1"), [id], event_from_row)
            .optional()?;
        Ok(event)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn mark_event_complete(&self, id: RecordId, completed: bool) -> Result<usize> {
        Ok(self.connection()?.execute(
            "UPDATE events SET completed = ?1 WHERE id = ?2",
            params![completed, id],
        )?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_event(&self, id: RecordId) -> Result<usize> {
        Ok(self
            .connection()?
            .execute("DELETE FROM events WHERE id = ?1", [id])?)
    }

    // Tasks

    #[instrument(level = "debug", skip_all, fields(title = %task.title))]
    pub fn add_task(&self, task: &NewTask) -> Result<RecordId> {
        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO tasks (title, description, priority, due_date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                task.title,
                task.description,
                task.priority.as_str(),
                task.due_date.map(format_date),
                format_second(time::now()),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Lists tasks by completion (open first, unless filtered), then priority,
    /// then due date with undated tasks last.
    pub fn get_tasks(&self, completed: Option<bool>) -> Result<Vec<Task>> {
        let conn = self.connection()?;
        let tasks = match completed {
            Some(completed) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {TASK_COLUMNS} FROM tasks WHERE completed = ?1 {TASK_ORDER}"
                ))?;
                stmt.query_map([completed], task_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt =
                    conn.prepare(&format!("SELECT {TASK_COLUMNS} FROM tasks {TASK_ORDER}"))?;
                stmt.query_map([], task_from_row)?
                    .collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(tasks)
    }

    pub fn get_task(&self, id: RecordId) -> Result<Option<Task>> {
        let task = self
            .connection()?
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                task_from_row,
            )
            .optional()?;
        Ok(task)
    }

    /// Sets the completion flag. Completing stamps `completed_at` unless the task
    /// already carries one; reopening clears it.
    #[instrument(level = "debug", skip(self))]
    pub fn mark_task_complete(&self, id: RecordId, completed: bool) -> Result<usize> {
        Ok(self.connection()?.execute(
            "UPDATE tasks
             SET completed = ?1,
                 completed_at = CASE WHEN ?1 THEN COALESCE(completed_at, ?2) ELSE NULL END
             WHERE id = ?3",
            params![completed, format_second(time::now()), id],
        )?)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete_task(&self, id: RecordId) -> Result<usize> {
        Ok(self
            .connection()?
            .execute("DELETE FROM tasks WHERE id = ?1", [id])?)
    }
}

fn open_connection(location: &StoreLocation) -> Result<Connection> {
    let mut conn = match location {
        StoreLocation::File(path) => {
            ensure_parent_dir(path)?;
            Connection::open(path)?
        }
        StoreLocation::Memory => Connection::open_in_memory()?,
    };
    bootstrap_connection(&mut conn)?;
    info!(location = ?location, "database opened");
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let value: Option<String> = ctx.get(0)?;
            Ok(value.map(|value| value.to_lowercase()))
        },
    )?;
    schema::apply_migrations(conn)
}

#[derive(Debug, Error)]
#[error("malformed stored value '{0}'")]
struct MalformedValue(String);

fn conversion_error(idx: usize, value: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(MalformedValue(value)))
}

fn text(row: &Row<'_>, idx: usize) -> rusqlite::Result<String> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDateTime> {
    let raw: String = row.get(idx)?;
    time::parse_stored_timestamp(&raw).ok_or_else(|| conversion_error(idx, raw))
}

fn optional_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => time::parse_stored_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| conversion_error(idx, raw)),
        _ => Ok(None),
    }
}

fn optional_date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
    match row.get::<_, Option<String>>(idx)? {
        Some(raw) if !raw.trim().is_empty() => time::parse_date(&raw)
            .map(Some)
            .ok_or_else(|| conversion_error(idx, raw)),
        _ => Ok(None),
    }
}

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: text(row, 1)?,
        surname: text(row, 2)?,
        phone: text(row, 3)?,
        email: text(row, 4)?,
        address: text(row, 5)?,
        notes: text(row, 6)?,
        created_at: timestamp(row, 7)?,
        updated_at: timestamp(row, 8)?,
    })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<Event> {
    Ok(Event {
        id: row.get(0)?,
        title: text(row, 1)?,
        description: text(row, 2)?,
        start: timestamp(row, 3)?,
        end: optional_timestamp(row, 4)?,
        location: text(row, 5)?,
        contact_id: row.get(6)?,
        reminder_minutes: row.get(7)?,
        completed: row.get(8)?,
        created_at: timestamp(row, 9)?,
        contact_name: row.get(10)?,
        contact_surname: row.get(11)?,
    })
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let raw_priority: String = row.get(3)?;
    let priority: Priority = raw_priority
        .parse()
        .map_err(|_| conversion_error(3, raw_priority))?;
    Ok(Task {
        id: row.get(0)?,
        title: text(row, 1)?,
        description: text(row, 2)?,
        priority,
        due_date: optional_date(row, 4)?,
        completed: row.get(5)?,
        created_at: timestamp(row, 6)?,
        completed_at: optional_timestamp(row, 7)?,
    })
}
