use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the different failure cases that can occur when the
/// agenda persists records, exchanges workbooks, or renders calendars.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors bubbled up from the SQLite driver.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the configuration file is not valid TOML for the expected shape.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Raised when an interactive prompt cannot read from the terminal.
    #[error("prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// Raised when a sheet does not follow the expected conventions.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a cell cannot be parsed into the type its column requires.
    #[error("invalid value '{value}' in sheet {sheet}, row {row}, column {column}")]
    InvalidCell {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },

    /// Raised when a priority name is not one of High, Medium or Low.
    #[error("unknown priority '{0}'")]
    InvalidPriority(String),

    /// Raised when the database was written by a newer schema than this binary knows.
    #[error("database schema version {found} is newer than supported {supported}")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
