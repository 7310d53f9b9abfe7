//! Synchronisation between the agenda store and spreadsheet workbooks.
//!
//! The store is the source of truth; workbooks are derived views that can be
//! re-created at any time. All reads and writes go through [`AgendaStore`].

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::error::Result;
use crate::flatten::{
    CONTACTS_SHEET, ContactRow, EVENTS_SHEET, EventRow, TASKS_SHEET, TaskRow, build_workbook,
    template_workbook,
};
use crate::io::excel_read::{self, AgendaSheets, SheetRow};
use crate::io::excel_write;
use crate::model::ContactPatch;
use crate::store::AgendaStore;

/// Number of records written to each sheet by an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub contacts: usize,
    pub events: usize,
    pub tasks: usize,
}

/// What an import did to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub contacts_added: usize,
    pub contacts_updated: usize,
    /// Rows ignored because their name was empty.
    pub contacts_skipped: usize,
    pub events_added: usize,
    /// Rows that carried an identifier; existing events are never updated.
    pub events_skipped: usize,
    pub tasks_added: usize,
    /// Rows that carried an identifier; existing tasks are never updated.
    pub tasks_skipped: usize,
}

/// Result of [`ExcelSync::import_from_excel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The workbook does not exist; nothing was read or written.
    MissingFile(PathBuf),
    Imported(ImportReport),
}

/// Exports the store to workbooks and absorbs edits made to them.
pub struct ExcelSync<'a> {
    store: &'a AgendaStore,
}

impl<'a> ExcelSync<'a> {
    pub fn new(store: &'a AgendaStore) -> Self {
        Self { store }
    }

    /// Writes an empty workbook with the three agenda sheets and their headers.
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub fn create_template(&self, path: &Path) -> Result<()> {
        excel_write::write_workbook(path, &template_workbook())?;
        info!("template written");
        Ok(())
    }

    /// Writes every record of the store, one row each, in store query order.
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub fn export_to_excel(&self, path: &Path) -> Result<ExportReport> {
        let contacts = self.store.get_contacts(None)?;
        let events = self.store.get_events(None, None)?;
        let tasks = self.store.get_tasks(None)?;

        let workbook = build_workbook(&contacts, &events, &tasks);
        debug!(sheet_count = workbook.tables.len(), "workbook constructed");
        excel_write::write_workbook(path, &workbook)?;

        let report = ExportReport {
            contacts: contacts.len(),
            events: events.len(),
            tasks: tasks.len(),
        };
        info!(
            contacts = report.contacts,
            events = report.events,
            tasks = report.tasks,
            "records exported"
        );
        Ok(report)
    }

    /// Loads a workbook into the store.
    ///
    /// Contact rows with an identifier overwrite that contact (blank cells become
    /// empty fields); rows without one are inserted. Event and task rows are only
    /// inserted when they have no identifier, so edits to exported events and
    /// tasks are not applied and their cells are not validated. Every row that
    /// would be written is validated before the first write. A missing file is
    /// reported through [`ImportOutcome::MissingFile`].
    #[instrument(level = "info", skip(self), fields(path = %path.display()))]
    pub fn import_from_excel(&self, path: &Path) -> Result<ImportOutcome> {
        if !path.exists() {
            warn!("workbook not found; nothing imported");
            return Ok(ImportOutcome::MissingFile(path.to_path_buf()));
        }

        let AgendaSheets {
            contacts,
            events,
            tasks,
        } = excel_read::read_agenda(path)?;
        let mut report = ImportReport::default();

        match contacts {
            Some(rows) => self.import_contacts(&rows, &mut report)?,
            None => debug!(sheet = CONTACTS_SHEET, "sheet absent"),
        }
        match events {
            Some(rows) => self.import_events(&rows, &mut report)?,
            None => debug!(sheet = EVENTS_SHEET, "sheet absent"),
        }
        match tasks {
            Some(rows) => self.import_tasks(&rows, &mut report)?,
            None => debug!(sheet = TASKS_SHEET, "sheet absent"),
        }

        info!(?report, "workbook imported");
        Ok(ImportOutcome::Imported(report))
    }

    fn import_contacts(
        &self,
        rows: &[SheetRow<ContactRow>],
        report: &mut ImportReport,
    ) -> Result<()> {
        for row in rows {
            let SheetRow::Complete(row) = row else {
                report.contacts_skipped += 1;
                continue;
            };
            match row.id {
                Some(id) => {
                    let patch = ContactPatch::replace_all(row.to_new_contact());
                    let changed = self.store.update_contact(id, &patch)?;
                    if changed == 0 {
                        debug!(id, "no contact with this id; row ignored");
                    }
                    report.contacts_updated += changed;
                }
                None => {
                    self.store.add_contact(&row.to_new_contact())?;
                    report.contacts_added += 1;
                }
            }
        }
        Ok(())
    }

    fn import_events(&self, rows: &[SheetRow<EventRow>], report: &mut ImportReport) -> Result<()> {
        for row in rows {
            match row {
                SheetRow::Complete(row) => {
                    let Some(event) = row.to_new_event() else {
                        continue;
                    };
                    self.store.add_event(&event)?;
                    report.events_added += 1;
                }
                SheetRow::Identified(id) => {
                    debug!(%id, "event row carries an identifier; not re-imported");
                    report.events_skipped += 1;
                }
                SheetRow::Incomplete => {}
            }
        }
        Ok(())
    }

    fn import_tasks(&self, rows: &[SheetRow<TaskRow>], report: &mut ImportReport) -> Result<()> {
        for row in rows {
            match row {
                SheetRow::Complete(row) => {
                    let Some(task) = row.to_new_task() else {
                        continue;
                    };
                    self.store.add_task(&task)?;
                    report.tasks_added += 1;
                }
                SheetRow::Identified(id) => {
                    debug!(%id, "task row carries an identifier; not re-imported");
                    report.tasks_skipped += 1;
                }
                SheetRow::Incomplete => {}
            }
        }
        Ok(())
    }
}
