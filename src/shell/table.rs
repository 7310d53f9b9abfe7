//! Fixed-width listings printed by the interactive menus.

use std::fmt::Write as _;

use crate::model::time::{format_date, format_minute};
use crate::model::{Contact, Event, Task};

fn check(flag: bool) -> &'static str {
    if flag { "✓" } else { "✗" }
}

pub fn contacts(contacts: &[Contact]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<20} {:<20} {:<15} {:<30}",
        "ID", "Name", "Surname", "Phone", "Email"
    );
    let _ = writeln!(out, "{}", "-".repeat(90));
    for contact in contacts {
        let _ = writeln!(
            out,
            "{:<5} {:<20} {:<20} {:<15} {:<30}",
            contact.id, contact.name, contact.surname, contact.phone, contact.email
        );
    }
    out
}

pub fn events(events: &[Event]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<25} {:<18} {:<20} {:<20} {:<5}",
        "ID", "Title", "Start", "Location", "Contact", "Done"
    );
    let _ = writeln!(out, "{}", "-".repeat(98));
    for event in events {
        let contact = match (&event.contact_name, &event.contact_surname) {
            (Some(name), Some(surname)) if !surname.is_empty() => format!("{name} {surname}"),
            (Some(name), _) => name.clone(),
            _ => String::new(),
        };
        let _ = writeln!(
            out,
            "{:<5} {:<25} {:<18} {:<20} {:<20} {:<5}",
            event.id,
            event.title,
            format_minute(event.start),
            event.location,
            contact,
            check(event.completed)
        );
    }
    out
}

pub fn tasks(tasks: &[Task]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<30} {:<10} {:<12} {:<5}",
        "ID", "Title", "Priority", "Due", "Done"
    );
    let _ = writeln!(out, "{}", "-".repeat(66));
    for task in tasks {
        let due = task.due_date.map_or_else(|| "N/A".to_string(), format_date);
        let _ = writeln!(
            out,
            "{:<5} {:<30} {:<10} {:<12} {:<5}",
            task.id,
            task.title,
            task.priority.as_str(),
            due,
            check(task.completed)
        );
    }
    out
}
