use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, ToolError};

pub const DEFAULT_DATABASE: &str = "data/agenda.db";
pub const DEFAULT_EXPORT_FILE: &str = "data/agenda_export.xlsx";
pub const DEFAULT_TEMPLATE_FILE: &str = "templates/agenda_template.xlsx";

/// File locations used by the agenda. Keys missing from the TOML file keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgendaConfig {
    pub database: PathBuf,
    pub export_file: PathBuf,
    pub template_file: PathBuf,
}

impl Default for AgendaConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            export_file: PathBuf::from(DEFAULT_EXPORT_FILE),
            template_file: PathBuf::from(DEFAULT_TEMPLATE_FILE),
        }
    }
}

impl AgendaConfig {
    /// Reads the configuration at `path`, or the defaults when no path is given.
    /// An explicit path that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(ToolError::MissingInput(path.to_path_buf()));
        }
        let raw = fs::read_to_string(path)?;
        let config = Self::parse(&raw)?;
        debug!(path = %path.display(), ?config, "configuration loaded");
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Replaces the database path when one was given on the command line.
    pub fn with_database(mut self, database: Option<PathBuf>) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        self
    }
}
