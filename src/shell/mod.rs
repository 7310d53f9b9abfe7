//! Numbered-menu front end over the agenda store and the workbook synchroniser.

pub mod table;

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use dialoguer::{Confirm, Input, Select};
use owo_colors::OwoColorize;
use tracing::debug;

use crate::config::AgendaConfig;
use crate::error::Result;
use crate::model::time::{parse_date, parse_event_time};
use crate::model::{ContactPatch, NewContact, NewEvent, NewTask, Priority, RecordId};
use crate::store::AgendaStore;
use crate::sync::{ExcelSync, ImportOutcome};

const MAIN_MENU: [&str; 7] = [
    "1. Contacts",
    "2. Events",
    "3. Tasks",
    "4. Export to Excel",
    "5. Import from Excel",
    "6. Create Excel template",
    "0. Exit",
];

const CONTACT_MENU: [&str; 6] = [
    "1. List contacts",
    "2. Search contacts",
    "3. Add contact",
    "4. Update contact",
    "5. Delete contact",
    "0. Back",
];

const EVENT_MENU: [&str; 6] = [
    "1. List events",
    "2. List events by date",
    "3. Add event",
    "4. Mark event as completed",
    "5. Delete event",
    "0. Back",
];

const TASK_MENU: [&str; 7] = [
    "1. List tasks",
    "2. List pending tasks",
    "3. List completed tasks",
    "4. Add task",
    "5. Mark task as completed",
    "6. Delete task",
    "0. Back",
];

/// Parses a record identifier typed by the user. Only plain digits are accepted.
pub fn parse_id(input: &str) -> Option<RecordId> {
    let input = input.trim();
    if input.is_empty() || !input.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Expands `YYYY-MM-DD` bounds to whole days: the start bound to 00:00 and the
/// end bound to 23:59. Blank bounds stay open. `None` when a bound is not a date.
pub fn expand_day_range(
    start: &str,
    end: &str,
) -> Option<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
    let bound = |text: &str, hour: u32, minute: u32| -> Option<Option<NaiveDateTime>> {
        let text = text.trim();
        if text.is_empty() {
            return Some(None);
        }
        let date = parse_date(text)?;
        Some(Some(date.and_hms_opt(hour, minute, 0)?))
    };
    Some((bound(start, 0, 0)?, bound(end, 23, 59)?))
}

/// Builds a partial update from prompt answers; blank answers keep the field.
pub fn patch_from_answers(answers: [String; 6]) -> ContactPatch {
    let [name, surname, phone, email, address, notes] =
        answers.map(|answer| Some(answer.trim().to_string()).filter(|value| !value.is_empty()));
    ContactPatch {
        name,
        surname,
        phone,
        email,
        address,
        notes,
    }
}

fn choose(title: &str, items: &[&str]) -> Result<usize> {
    println!();
    Ok(Select::new()
        .with_prompt(title)
        .items(items)
        .default(0)
        .interact()?)
}

fn ask(prompt: &str) -> Result<String> {
    let answer: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(answer.trim().to_string())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}

fn success(message: &str) {
    println!("\n{} {message}", "✓".green());
}

fn notice(message: &str) {
    println!("\n{}", message.yellow());
}

/// Interactive session bound to one store.
pub struct Shell<'a> {
    store: &'a AgendaStore,
    config: &'a AgendaConfig,
}

impl<'a> Shell<'a> {
    pub fn new(store: &'a AgendaStore, config: &'a AgendaConfig) -> Self {
        Self { store, config }
    }

    /// Runs the main menu until the user picks exit.
    pub fn run(&self) -> Result<()> {
        println!("{}", "=".repeat(60));
        println!("{:^60}", "PERSONAL AGENDA 2026".bold());
        println!("{}", "=".repeat(60));
        loop {
            match choose("Main menu", &MAIN_MENU)? {
                0 => self.contact_menu()?,
                1 => self.event_menu()?,
                2 => self.task_menu()?,
                3 => self.export()?,
                4 => self.import()?,
                5 => self.template()?,
                _ => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            }
        }
    }

    fn contact_menu(&self) -> Result<()> {
        loop {
            match choose("Contacts", &CONTACT_MENU)? {
                0 => self.list_contacts(None)?,
                1 => {
                    let search = ask("Name or email to search")?;
                    self.list_contacts(Some(&search))?;
                }
                2 => self.add_contact()?,
                3 => self.update_contact()?,
                4 => self.delete_contact()?,
                _ => return Ok(()),
            }
        }
    }

    fn event_menu(&self) -> Result<()> {
        loop {
            match choose("Events", &EVENT_MENU)? {
                0 => self.list_events(None, None)?,
                1 => self.list_events_by_date()?,
                2 => self.add_event()?,
                3 => self.complete_event()?,
                4 => self.delete_event()?,
                _ => return Ok(()),
            }
        }
    }

    fn task_menu(&self) -> Result<()> {
        loop {
            match choose("Tasks", &TASK_MENU)? {
                0 => self.list_tasks(None)?,
                1 => self.list_tasks(Some(false))?,
                2 => self.list_tasks(Some(true))?,
                3 => self.add_task()?,
                4 => self.complete_task()?,
                5 => self.delete_task()?,
                _ => return Ok(()),
            }
        }
    }

    fn list_contacts(&self, search: Option<&str>) -> Result<()> {
        let contacts = self.store.get_contacts(search)?;
        match (contacts.is_empty(), search) {
            (true, Some(search)) if !search.is_empty() => {
                notice(&format!("No contacts match '{search}'."))
            }
            (true, _) => notice("No contacts registered."),
            (false, _) => print!("\n{}", table::contacts(&contacts)),
        }
        Ok(())
    }

    fn add_contact(&self) -> Result<()> {
        let name = ask("Name (*)")?;
        if name.is_empty() {
            notice("The name is required.");
            return Ok(());
        }
        let contact = NewContact {
            name,
            surname: ask("Surname")?,
            phone: ask("Phone")?,
            email: ask("Email")?,
            address: ask("Address")?,
            notes: ask("Notes")?,
        };
        let id = self.store.add_contact(&contact)?;
        success(&format!("Contact added with ID {id}"));
        Ok(())
    }

    fn update_contact(&self) -> Result<()> {
        self.list_contacts(None)?;
        let Some(id) = self.ask_id("ID of the contact to update")? else {
            return Ok(());
        };
        println!("Leave a field blank to keep its current value.");
        let patch = patch_from_answers([
            ask("Name")?,
            ask("Surname")?,
            ask("Phone")?,
            ask("Email")?,
            ask("Address")?,
            ask("Notes")?,
        ]);
        if patch.is_empty() {
            notice("No changes made.");
            return Ok(());
        }
        match self.store.update_contact(id, &patch)? {
            0 => notice(&format!("No contact with ID {id}.")),
            _ => success("Contact updated"),
        }
        Ok(())
    }

    fn delete_contact(&self) -> Result<()> {
        self.list_contacts(None)?;
        let Some(id) = self.ask_id("ID of the contact to delete")? else {
            return Ok(());
        };
        if confirm("Are you sure?")? {
            self.report_removal(self.store.delete_contact(id)?, "Contact", id);
        }
        Ok(())
    }

    fn list_events(&self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Result<()> {
        let events = self.store.get_events(start, end)?;
        if events.is_empty() {
            notice("No events found.");
        } else {
            print!("\n{}", table::events(&events));
        }
        Ok(())
    }

    fn list_events_by_date(&self) -> Result<()> {
        let start = ask("Start date (YYYY-MM-DD)")?;
        let end = ask("End date (YYYY-MM-DD)")?;
        match expand_day_range(&start, &end) {
            Some((start, end)) => self.list_events(start, end),
            None => {
                notice("Dates must use the YYYY-MM-DD format.");
                Ok(())
            }
        }
    }

    fn add_event(&self) -> Result<()> {
        let title = ask("Title (*)")?;
        if title.is_empty() {
            notice("The title is required.");
            return Ok(());
        }
        let description = ask("Description")?;
        let start_text = ask("Start (YYYY-MM-DD HH:MM) (*)")?;
        let Some(start) = parse_event_time(&start_text) else {
            notice("A valid start date is required.");
            return Ok(());
        };
        let end_text = ask("End (YYYY-MM-DD HH:MM)")?;
        let end = match end_text.as_str() {
            "" => None,
            text => match parse_event_time(text) {
                Some(end) => Some(end),
                None => {
                    notice("The end date is not valid.");
                    return Ok(());
                }
            },
        };
        let location = ask("Location")?;
        let contact_id = parse_id(&ask("Contact ID (optional)")?);
        let reminder_minutes = ask("Reminder in minutes (0 for none)")?
            .parse()
            .unwrap_or(0);

        let event = NewEvent {
            title,
            description,
            start,
            end,
            location,
            contact_id,
            reminder_minutes,
        };
        let id = self.store.add_event(&event)?;
        success(&format!("Event added with ID {id}"));
        Ok(())
    }

    fn complete_event(&self) -> Result<()> {
        self.list_events(None, None)?;
        let Some(id) = self.ask_id("ID of the event to mark as completed")? else {
            return Ok(());
        };
        match self.store.mark_event_complete(id, true)? {
            0 => notice(&format!("No event with ID {id}.")),
            _ => success("Event marked as completed"),
        }
        Ok(())
    }

    fn delete_event(&self) -> Result<()> {
        self.list_events(None, None)?;
        let Some(id) = self.ask_id("ID of the event to delete")? else {
            return Ok(());
        };
        if confirm("Are you sure?")? {
            self.report_removal(self.store.delete_event(id)?, "Event", id);
        }
        Ok(())
    }

    fn list_tasks(&self, completed: Option<bool>) -> Result<()> {
        let tasks = self.store.get_tasks(completed)?;
        if tasks.is_empty() {
            notice("No tasks found.");
        } else {
            print!("\n{}", table::tasks(&tasks));
        }
        Ok(())
    }

    fn add_task(&self) -> Result<()> {
        let title = ask("Title (*)")?;
        if title.is_empty() {
            notice("The title is required.");
            return Ok(());
        }
        let description = ask("Description")?;
        let labels: Vec<&str> = Priority::ALL.iter().map(|priority| priority.as_str()).collect();
        let default = Priority::ALL
            .iter()
            .position(|priority| *priority == Priority::default())
            .unwrap_or(0);
        let priority = Select::new()
            .with_prompt("Priority")
            .items(&labels[..])
            .default(default)
            .interact()?;
        let due_text = ask("Due date (YYYY-MM-DD)")?;
        let due_date = match due_text.as_str() {
            "" => None,
            text => match parse_date(text) {
                Some(date) => Some(date),
                None => {
                    notice("The due date is not valid.");
                    return Ok(());
                }
            },
        };

        let task = NewTask {
            title,
            description,
            priority: Priority::ALL[priority],
            due_date,
        };
        let id = self.store.add_task(&task)?;
        success(&format!("Task added with ID {id}"));
        Ok(())
    }

    fn complete_task(&self) -> Result<()> {
        self.list_tasks(Some(false))?;
        let Some(id) = self.ask_id("ID of the task to mark as completed")? else {
            return Ok(());
        };
        match self.store.mark_task_complete(id, true)? {
            0 => notice(&format!("No task with ID {id}.")),
            _ => success("Task marked as completed"),
        }
        Ok(())
    }

    fn delete_task(&self) -> Result<()> {
        self.list_tasks(None)?;
        let Some(id) = self.ask_id("ID of the task to delete")? else {
            return Ok(());
        };
        if confirm("Are you sure?")? {
            self.report_removal(self.store.delete_task(id)?, "Task", id);
        }
        Ok(())
    }

    fn export(&self) -> Result<()> {
        let path = self.ask_path("Export file", &self.config.export_file)?;
        let report = ExcelSync::new(self.store).export_to_excel(&path)?;
        success(&format!(
            "Exported {} contacts, {} events and {} tasks to {}",
            report.contacts,
            report.events,
            report.tasks,
            path.display()
        ));
        Ok(())
    }

    fn import(&self) -> Result<()> {
        let answer = ask("File to import")?;
        if answer.is_empty() {
            return Ok(());
        }
        match ExcelSync::new(self.store).import_from_excel(&PathBuf::from(answer))? {
            ImportOutcome::MissingFile(path) => {
                notice(&format!("File {} not found.", path.display()))
            }
            ImportOutcome::Imported(report) => success(&format!(
                "Imported: {} contacts added, {} updated; {} events and {} tasks added",
                report.contacts_added,
                report.contacts_updated,
                report.events_added,
                report.tasks_added
            )),
        }
        Ok(())
    }

    fn template(&self) -> Result<()> {
        let path = self.ask_path("Template file", &self.config.template_file)?;
        ExcelSync::new(self.store).create_template(&path)?;
        success(&format!("Template created at {}", path.display()));
        Ok(())
    }

    fn ask_id(&self, prompt: &str) -> Result<Option<RecordId>> {
        let answer = ask(prompt)?;
        let id = parse_id(&answer);
        if id.is_none() {
            debug!(answer = %answer, "rejected identifier");
            notice("Invalid ID.");
        }
        Ok(id)
    }

    fn ask_path(&self, prompt: &str, default: &Path) -> Result<PathBuf> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .default(default.display().to_string())
            .interact_text()?;
        Ok(PathBuf::from(answer.trim()))
    }

    fn report_removal(&self, removed: usize, kind: &str, id: RecordId) {
        if removed == 0 {
            notice(&format!("No {} with ID {id}.", kind.to_lowercase()));
        } else {
            success(&format!("{kind} deleted"));
        }
    }
}
