//! Schema migrations for the agenda database.
//!
//! The applied version is mirrored to `PRAGMA user_version`; migrations run in
//! one transaction and only those above the current version are applied.

use rusqlite::Connection;

use crate::error::{Result, ToolError};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

// `contact_id` is informational only. Foreign key enforcement stays off so that
// deleting a contact neither cascades nor fails, and dangling ids are accepted.
const INIT: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    surname     TEXT,
    phone       TEXT,
    email       TEXT,
    address     TEXT,
    notes       TEXT,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS events (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    title             TEXT NOT NULL,
    description       TEXT,
    start             TEXT NOT NULL,   -- YYYY-MM-DD HH:MM
    "end"             TEXT,
    location          TEXT,
    contact_id        INTEGER REFERENCES contacts (id),
    reminder_minutes  INTEGER NOT NULL DEFAULT 0,
    completed         INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    title         TEXT NOT NULL,
    description   TEXT,
    priority      TEXT NOT NULL DEFAULT 'Medium',
    due_date      TEXT,                -- YYYY-MM-DD
    completed     INTEGER NOT NULL DEFAULT 0,
    created_at    TEXT NOT NULL,
    completed_at  TEXT
);

CREATE INDEX IF NOT EXISTS events_start_idx ON events (start);
"#;

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: INIT,
}];

/// Returns the latest schema version known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Applies all pending migrations on the provided connection.
pub fn apply_migrations(conn: &mut Connection) -> Result<()> {
    let current = current_version(conn)?;
    let latest = latest_version();

    if current > latest {
        return Err(ToolError::UnsupportedSchemaVersion {
            found: current,
            supported: latest,
        });
    }
    if current == latest {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;
    Ok(())
}

pub fn current_version(conn: &Connection) -> Result<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?)
}
