use agenda_tools::model::{ContactPatch, NewContact, NewEvent, NewTask, Priority};
use agenda_tools::store::AgendaStore;
use chrono::{NaiveDate, NaiveDateTime};
use tempfile::tempdir;

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn task(title: &str, priority: Priority, due: Option<(u32, u32)>) -> NewTask {
    NewTask {
        priority,
        due_date: due.map(|(month, day)| NaiveDate::from_ymd_opt(2026, month, day).expect("date")),
        ..NewTask::new(title)
    }
}

#[test]
fn identifiers_increase_and_are_not_reused() {
    let store = AgendaStore::in_memory();
    let first = store.add_contact(&NewContact::new("Ana")).expect("added");
    let second = store.add_contact(&NewContact::new("Bruno")).expect("added");
    assert!(second > first);

    store.delete_contact(second).expect("deleted");
    let third = store.add_contact(&NewContact::new("Carla")).expect("added");
    assert!(third > second);
}

#[test]
fn contact_search_ignores_case_beyond_ascii() {
    let store = AgendaStore::in_memory();
    store
        .add_contact(&NewContact {
            surname: "López".into(),
            ..NewContact::new("María")
        })
        .expect("added");
    store
        .add_contact(&NewContact {
            email: "pedro@example.com".into(),
            ..NewContact::new("Pedro")
        })
        .expect("added");

    let lower = store.get_contacts(Some("maría")).expect("search");
    let upper = store.get_contacts(Some("MARÍA")).expect("search");
    assert_eq!(lower.len(), 1);
    assert_eq!(lower, upper);
    assert_eq!(store.get_contacts(Some("lópez")).expect("search").len(), 1);
    assert_eq!(store.get_contacts(Some("EXAMPLE")).expect("search").len(), 1);
    assert_eq!(store.get_contacts(Some("")).expect("search").len(), 2);
    assert!(store.get_contacts(Some("zzz")).expect("search").is_empty());
}

#[test]
fn whitespace_search_is_a_substring_match() {
    let store = AgendaStore::in_memory();
    store
        .add_contact(&NewContact {
            surname: "de la Fuente".into(),
            ..NewContact::new("Inés")
        })
        .expect("added");
    store.add_contact(&NewContact::new("Pedro")).expect("added");

    let spaced = store.get_contacts(Some(" ")).expect("search");
    assert_eq!(spaced.len(), 1);
    assert_eq!(spaced[0].name, "Inés");
    assert!(store.get_contacts(Some("  ")).expect("search").is_empty());
}

#[test]
fn contacts_are_listed_by_name_then_surname() {
    let store = AgendaStore::in_memory();
    for (name, surname) in [("Luis", "Zapata"), ("Ana", "Ruiz"), ("Luis", "Alvarez")] {
        store
            .add_contact(&NewContact {
                surname: surname.into(),
                ..NewContact::new(name)
            })
            .expect("added");
    }
    let order: Vec<(String, String)> = store
        .get_contacts(None)
        .expect("listed")
        .into_iter()
        .map(|contact| (contact.name, contact.surname))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Ana".to_string(), "Ruiz".to_string()),
            ("Luis".to_string(), "Alvarez".to_string()),
            ("Luis".to_string(), "Zapata".to_string()),
        ]
    );
}

#[test]
fn partial_update_changes_only_supplied_fields() {
    let store = AgendaStore::in_memory();
    let id = store
        .add_contact(&NewContact {
            phone: "555-0100".into(),
            email: "ana@example.com".into(),
            ..NewContact::new("Ana")
        })
        .expect("added");

    let patch = ContactPatch {
        phone: Some("555-0199".into()),
        ..ContactPatch::default()
    };
    assert_eq!(store.update_contact(id, &patch).expect("updated"), 1);

    let contact = store.get_contact(id).expect("read").expect("present");
    assert_eq!(contact.phone, "555-0199");
    assert_eq!(contact.name, "Ana");
    assert_eq!(contact.email, "ana@example.com");
    assert!(contact.updated_at >= contact.created_at);
}

#[test]
fn empty_patch_and_missing_ids_change_nothing() {
    let store = AgendaStore::in_memory();
    let id = store.add_contact(&NewContact::new("Ana")).expect("added");
    let event = store
        .add_event(&NewEvent::new("Dentist", at(3, 12, 9, 0)))
        .expect("added");
    let task = store.add_task(&NewTask::new("Taxes")).expect("added");
    let before = store.get_contact(id).expect("read");
    let events_before = store.get_events(None, None).expect("listed");
    let tasks_before = store.get_tasks(None).expect("listed");
    assert_eq!((events_before.len(), tasks_before.len()), (1, 1));

    assert_eq!(store.update_contact(id, &ContactPatch::default()).expect("no-op"), 0);
    assert_eq!(store.get_contact(id).expect("read"), before);

    let patch = ContactPatch {
        name: Some("Ghost".into()),
        ..ContactPatch::default()
    };
    assert_eq!(store.update_contact(999, &patch).expect("no row"), 0);
    assert_eq!(store.delete_contact(999).expect("no row"), 0);
    assert_eq!(store.delete_event(999).expect("no row"), 0);
    assert_eq!(store.delete_task(999).expect("no row"), 0);
    assert_eq!(store.mark_event_complete(999, true).expect("no row"), 0);
    assert_eq!(store.mark_task_complete(999, true).expect("no row"), 0);
    assert_eq!(store.get_contacts(None).expect("listed").len(), 1);
    assert_eq!(store.get_events(None, None).expect("listed"), events_before);
    assert_eq!(store.get_tasks(None).expect("listed"), tasks_before);
    assert!(store.get_event(event).expect("read").is_some());
    assert!(store.get_task(task).expect("read").is_some());
}

#[test]
fn events_are_ordered_by_start_and_filtered_inclusively() {
    let store = AgendaStore::in_memory();
    let late = store
        .add_event(&NewEvent::new("Late", at(3, 20, 18, 0)))
        .expect("added");
    let early = store
        .add_event(&NewEvent::new("Early", at(3, 1, 9, 30)))
        .expect("added");
    let middle = store
        .add_event(&NewEvent::new("Middle", at(3, 10, 12, 0)))
        .expect("added");

    let ids: Vec<_> = store
        .get_events(None, None)
        .expect("listed")
        .iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(ids, vec![early, middle, late]);

    let ranged = store
        .get_events(Some(at(3, 1, 9, 30)), Some(at(3, 10, 12, 0)))
        .expect("ranged");
    assert_eq!(
        ranged.iter().map(|event| event.id).collect::<Vec<_>>(),
        vec![early, middle]
    );

    let exact = store
        .get_events(Some(at(3, 10, 12, 0)), Some(at(3, 10, 12, 0)))
        .expect("exact");
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].id, middle);

    let whole_day = store
        .get_events(Some(at(3, 20, 0, 0)), Some(at(3, 20, 23, 59)))
        .expect("day");
    assert_eq!(whole_day.len(), 1);
    assert_eq!(whole_day[0].title, "Late");
}

#[test]
fn event_contact_reference_is_weak() {
    let store = AgendaStore::in_memory();
    let contact = store
        .add_contact(&NewContact {
            surname: "Pérez".into(),
            ..NewContact::new("Ana")
        })
        .expect("added");
    let linked = store
        .add_event(&NewEvent {
            contact_id: Some(contact),
            reminder_minutes: 30,
            ..NewEvent::new("Lunch", at(4, 1, 13, 0))
        })
        .expect("added");
    let dangling = store
        .add_event(&NewEvent {
            contact_id: Some(4242),
            ..NewEvent::new("Call", at(4, 2, 10, 0))
        })
        .expect("dangling reference accepted");

    let event = store.get_event(linked).expect("read").expect("present");
    assert_eq!(event.contact_name.as_deref(), Some("Ana"));
    assert_eq!(event.contact_surname.as_deref(), Some("Pérez"));
    assert_eq!(event.reminder_minutes, 30);
    assert!(!event.completed);

    let orphan = store.get_event(dangling).expect("read").expect("present");
    assert_eq!(orphan.contact_id, Some(4242));
    assert_eq!(orphan.contact_name, None);

    assert_eq!(store.delete_contact(contact).expect("deleted"), 1);
    let event = store.get_event(linked).expect("read").expect("not cascaded");
    assert_eq!(event.contact_id, Some(contact));
    assert_eq!(event.contact_name, None);
}

#[test]
fn events_can_be_completed_and_reopened() {
    let store = AgendaStore::in_memory();
    let id = store
        .add_event(&NewEvent {
            end: Some(at(5, 1, 11, 0)),
            ..NewEvent::new("Meeting", at(5, 1, 10, 0))
        })
        .expect("added");
    assert_eq!(store.mark_event_complete(id, true).expect("marked"), 1);
    assert!(store.get_event(id).expect("read").expect("present").completed);
    store.mark_event_complete(id, false).expect("reopened");
    let event = store.get_event(id).expect("read").expect("present");
    assert!(!event.completed);
    assert_eq!(event.end, Some(at(5, 1, 11, 0)));
}

#[test]
fn tasks_are_ordered_by_completion_priority_and_due_date() {
    let store = AgendaStore::in_memory();
    let low = store.add_task(&task("low", Priority::Low, Some((1, 1)))).expect("added");
    let high_undated = store.add_task(&task("high undated", Priority::High, None)).expect("added");
    let high_late = store
        .add_task(&task("high late", Priority::High, Some((6, 1))))
        .expect("added");
    let high_soon = store
        .add_task(&task("high soon", Priority::High, Some((2, 1))))
        .expect("added");
    let medium = store.add_task(&NewTask::new("medium")).expect("added");
    let done = store.add_task(&task("done", Priority::High, Some((1, 1)))).expect("added");
    store.mark_task_complete(done, true).expect("completed");

    let ids: Vec<_> = store
        .get_tasks(None)
        .expect("listed")
        .iter()
        .map(|task| task.id)
        .collect();
    assert_eq!(ids, vec![high_soon, high_late, high_undated, medium, low, done]);

    let pending = store.get_tasks(Some(false)).expect("pending");
    assert_eq!(pending.len(), 5);
    assert!(pending.iter().all(|task| !task.completed));
    let completed = store.get_tasks(Some(true)).expect("completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done);
    assert_eq!(
        store.get_task(medium).expect("read").expect("present").priority,
        Priority::Medium
    );
}

#[test]
fn completion_time_is_set_kept_and_cleared() {
    let store = AgendaStore::in_memory();
    let id = store.add_task(&NewTask::new("Report")).expect("added");
    assert_eq!(store.get_task(id).expect("read").expect("present").completed_at, None);

    store.mark_task_complete(id, true).expect("completed");
    let first = store.get_task(id).expect("read").expect("present");
    assert!(first.completed);
    let stamped = first.completed_at.expect("completion time");
    assert!(stamped >= first.created_at);

    store.mark_task_complete(id, true).expect("completed again");
    let again = store.get_task(id).expect("read").expect("present");
    assert_eq!(again.completed_at, Some(stamped));

    store.mark_task_complete(id, false).expect("reopened");
    let reopened = store.get_task(id).expect("read").expect("present");
    assert!(!reopened.completed);
    assert_eq!(reopened.completed_at, None);
}

#[test]
fn file_store_reopens_after_close() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("nested").join("agenda.db");

    let mut store = AgendaStore::new(&path);
    assert!(!store.is_open());
    let id = store.add_contact(&NewContact::new("Ana")).expect("added");
    assert!(store.is_open());
    assert!(path.exists());

    store.close().expect("closed");
    assert!(!store.is_open());
    store.close().expect("closing twice is harmless");

    let contact = store.get_contact(id).expect("reopened").expect("persisted");
    assert_eq!(contact.name, "Ana");

    drop(store);
    let fresh = AgendaStore::new(&path);
    assert_eq!(fresh.get_contacts(None).expect("listed").len(), 1);
}

#[test]
fn undated_tasks_follow_priority_rank() {
    let store = AgendaStore::in_memory();
    for priority in [Priority::Low, Priority::High, Priority::Medium] {
        store
            .add_task(&task(priority.as_str(), priority, None))
            .expect("added");
    }
    let order: Vec<Priority> = store
        .get_tasks(None)
        .expect("listed")
        .iter()
        .map(|task| task.priority)
        .collect();
    assert_eq!(order, vec![Priority::High, Priority::Medium, Priority::Low]);
}
