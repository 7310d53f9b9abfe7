use agenda_tools::ToolError;
use agenda_tools::flatten::{
    CONTACTS_SHEET, CellValue, ContactRow, EVENTS_LAYOUT, EVENTS_SHEET, EXPORT_ONLY_HEADERS,
    EventRow, TASKS_LAYOUT, TASKS_SHEET, TaskRow, build_workbook,
};
use agenda_tools::io::excel_read::{self, SheetRow};
use agenda_tools::io::excel_write;
use agenda_tools::model::{NewContact, NewEvent, NewTask, Priority};
use agenda_tools::store::AgendaStore;
use agenda_tools::sync::{ExcelSync, ImportOutcome, ImportReport};
use calamine::{Reader, Xlsx, open_workbook};
use chrono::{NaiveDate, NaiveDateTime};
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, month, day)
        .expect("valid date")
        .and_hms_opt(hour, minute, 0)
        .expect("valid time")
}

fn seeded_store() -> AgendaStore {
    let store = AgendaStore::in_memory();
    let ana = store
        .add_contact(&NewContact {
            surname: "Pérez".into(),
            phone: "011 4555-0100".into(),
            email: "ana@example.com".into(),
            address: "Av. Corrientes 1234".into(),
            notes: "Prefers mornings".into(),
            ..NewContact::new("Ana")
        })
        .expect("contact added");
    store
        .add_contact(&NewContact::new("Bruno"))
        .expect("contact added");
    let lunch = store
        .add_event(&NewEvent {
            description: "Quarterly catch-up".into(),
            end: Some(at(3, 10, 14, 0)),
            location: "Café Tortoni".into(),
            contact_id: Some(ana),
            reminder_minutes: 30,
            ..NewEvent::new("Lunch", at(3, 10, 13, 0))
        })
        .expect("event added");
    store.mark_event_complete(lunch, true).expect("completed");
    store
        .add_event(&NewEvent::new("Dentist", at(3, 12, 9, 0)))
        .expect("event added");
    let taxes = store
        .add_task(&NewTask {
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 6, 30),
            ..NewTask::new("File taxes")
        })
        .expect("task added");
    store.mark_task_complete(taxes, true).expect("completed");
    store
        .add_task(&NewTask::new("Buy stamps"))
        .expect("task added");
    store
}

#[test]
fn export_writes_every_record_in_store_order() {
    let store = seeded_store();
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("out").join("agenda.xlsx");

    let report = ExcelSync::new(&store)
        .export_to_excel(&xlsx_path)
        .expect("export succeeded");
    assert_eq!((report.contacts, report.events, report.tasks), (2, 2, 2));

    let sheets = excel_read::read_agenda(&xlsx_path).expect("Excel read");
    let contacts: Vec<SheetRow<ContactRow>> = store
        .get_contacts(None)
        .expect("contacts")
        .iter()
        .map(|contact| SheetRow::Complete(ContactRow::from(contact)))
        .collect();
    let events: Vec<SheetRow<EventRow>> = store
        .get_events(None, None)
        .expect("events")
        .iter()
        .map(|event| SheetRow::Identified(event.id.to_string()))
        .collect();
    let tasks: Vec<SheetRow<TaskRow>> = store
        .get_tasks(None)
        .expect("tasks")
        .iter()
        .map(|task| SheetRow::Identified(task.id.to_string()))
        .collect();

    assert_eq!(sheets.contacts, Some(contacts));
    assert_eq!(sheets.events, Some(events));
    assert_eq!(sheets.tasks, Some(tasks));
}

#[test]
fn reimporting_an_export_updates_contacts_and_skips_identified_rows() {
    let store = seeded_store();
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("agenda.xlsx");
    let sync = ExcelSync::new(&store);
    sync.export_to_excel(&xlsx_path).expect("export succeeded");

    let before_contacts = store.get_contacts(None).expect("contacts");
    let before_events = store.get_events(None, None).expect("events");
    let before_tasks = store.get_tasks(None).expect("tasks");

    let outcome = sync.import_from_excel(&xlsx_path).expect("import succeeded");
    assert_eq!(
        outcome,
        ImportOutcome::Imported(ImportReport {
            contacts_updated: 2,
            events_skipped: 2,
            tasks_skipped: 2,
            ..ImportReport::default()
        })
    );

    let after_contacts = store.get_contacts(None).expect("contacts");
    assert_eq!(after_contacts.len(), before_contacts.len());
    for (before, after) in before_contacts.iter().zip(&after_contacts) {
        assert_eq!(ContactRow::from(before), ContactRow::from(after));
    }
    assert_eq!(store.get_events(None, None).expect("events"), before_events);
    assert_eq!(store.get_tasks(None).expect("tasks"), before_tasks);
}

#[test]
fn edits_to_exported_events_are_not_applied_but_new_rows_are_inserted() {
    let store = seeded_store();
    let contacts = store.get_contacts(None).expect("contacts");
    let events = store.get_events(None, None).expect("events");
    let tasks = store.get_tasks(None).expect("tasks");
    let mut workbook = build_workbook(&contacts, &events, &tasks);

    // Rename an exported event and contact, then append rows without identifiers.
    let events_table = &mut workbook.tables[1];
    assert_eq!(events_table.sheet_name(), EVENTS_SHEET);
    events_table.rows[0][1] = CellValue::text("Renamed lunch");
    events_table.rows.push(
        EventRow {
            title: "Concert".into(),
            start: Some(at(4, 3, 21, 0)),
            reminder_minutes: 60,
            ..EventRow::default()
        }
        .into_cells(),
    );
    let contacts_table = &mut workbook.tables[0];
    assert_eq!(contacts_table.sheet_name(), CONTACTS_SHEET);
    contacts_table.rows[0][4] = CellValue::Empty;
    contacts_table.rows.push(
        ContactRow {
            name: "Carla".into(),
            ..ContactRow::default()
        }
        .into_cells(),
    );
    let tasks_table = &mut workbook.tables[2];
    assert_eq!(tasks_table.sheet_name(), TASKS_SHEET);
    tasks_table.rows.push(
        TaskRow {
            title: "Renew passport".into(),
            priority: Priority::Low,
            ..TaskRow::default()
        }
        .into_cells(),
    );

    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("edited.xlsx");
    excel_write::write_workbook(&xlsx_path, &workbook).expect("Excel written");

    let outcome = ExcelSync::new(&store)
        .import_from_excel(&xlsx_path)
        .expect("import succeeded");
    let ImportOutcome::Imported(report) = outcome else {
        panic!("workbook exists");
    };
    assert_eq!(report.contacts_added, 1);
    assert_eq!(report.contacts_updated, 2);
    assert_eq!((report.events_added, report.events_skipped), (1, 2));
    assert_eq!((report.tasks_added, report.tasks_skipped), (1, 2));

    let lunch = store
        .get_event(events[0].id)
        .expect("read")
        .expect("present");
    assert_eq!(lunch.title, "Lunch");

    let renamed_contact = store
        .get_contact(contacts[0].id)
        .expect("read")
        .expect("present");
    assert_eq!(renamed_contact.email, "", "blank cells overwrite on update");

    let all_events = store.get_events(None, None).expect("events");
    assert_eq!(all_events.len(), 3);
    let concert = all_events
        .iter()
        .find(|event| event.title == "Concert")
        .expect("inserted");
    assert_eq!(concert.reminder_minutes, 60);
    assert!(!concert.completed);

    let passport = store
        .get_tasks(Some(false))
        .expect("tasks")
        .into_iter()
        .find(|task| task.title == "Renew passport")
        .expect("inserted");
    assert_eq!(passport.priority, Priority::Low);
    assert_eq!(store.get_contacts(Some("carla")).expect("search").len(), 1);
}

#[test]
fn edited_cells_of_identified_rows_do_not_block_contact_updates() {
    let store = seeded_store();
    let contacts = store.get_contacts(None).expect("contacts");
    let events = store.get_events(None, None).expect("events");
    let tasks = store.get_tasks(None).expect("tasks");
    let mut workbook = build_workbook(&contacts, &events, &tasks);

    workbook.tables[0].rows[0][1] = CellValue::text("Anabel");
    workbook.tables[1].rows[0][3] = CellValue::text("tbd");
    workbook.tables[2].rows[0][5] = CellValue::text("done");

    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("edited.xlsx");
    excel_write::write_workbook(&xlsx_path, &workbook).expect("Excel written");

    let outcome = ExcelSync::new(&store)
        .import_from_excel(&xlsx_path)
        .expect("import succeeded");
    assert_eq!(
        outcome,
        ImportOutcome::Imported(ImportReport {
            contacts_updated: 2,
            events_skipped: 2,
            tasks_skipped: 2,
            ..ImportReport::default()
        })
    );

    let renamed = store
        .get_contact(contacts[0].id)
        .expect("read")
        .expect("present");
    assert_eq!(renamed.name, "Anabel");
    assert_eq!(store.get_events(None, None).expect("events"), events);
    assert_eq!(store.get_tasks(None).expect("tasks"), tasks);
}

#[test]
fn completion_columns_are_not_required_on_import() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("short.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(TASKS_SHEET).expect("sheet named");
    let headers: Vec<&str> = TASKS_LAYOUT
        .headers()
        .filter(|header| !EXPORT_ONLY_HEADERS.contains(header))
        .collect();
    for (col, header) in headers.iter().enumerate() {
        sheet
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    sheet.write_string(1, 1, "Water plants").expect("cell written");
    sheet.write_string(1, 3, "high").expect("cell written");
    workbook.save(&xlsx_path).expect("workbook saved");

    let store = AgendaStore::in_memory();
    let outcome = ExcelSync::new(&store)
        .import_from_excel(&xlsx_path)
        .expect("import succeeded");
    assert_eq!(
        outcome,
        ImportOutcome::Imported(ImportReport {
            tasks_added: 1,
            ..ImportReport::default()
        })
    );
    let tasks = store.get_tasks(None).expect("tasks");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Water plants");
    assert_eq!(tasks[0].priority, Priority::High);
    assert!(!tasks[0].completed);
}

#[test]
fn template_has_three_header_only_sheets() {
    let store = AgendaStore::in_memory();
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("templates").join("agenda_template.xlsx");
    ExcelSync::new(&store)
        .create_template(&xlsx_path)
        .expect("template written");

    let mut workbook: Xlsx<_> = open_workbook(&xlsx_path).expect("workbook opened");
    assert_eq!(
        workbook.sheet_names().to_vec(),
        vec![
            CONTACTS_SHEET.to_string(),
            EVENTS_SHEET.to_string(),
            TASKS_SHEET.to_string()
        ]
    );
    let events = workbook
        .worksheet_range(EVENTS_SHEET)
        .expect("sheet present")
        .expect("sheet read");
    assert_eq!(events.height(), 1);
    let header: Vec<String> = events
        .rows()
        .next()
        .expect("header row")
        .iter()
        .map(|cell| cell.to_string())
        .collect();
    let expected: Vec<String> = EVENTS_LAYOUT.headers().map(str::to_string).collect();
    assert_eq!(header, expected);

    let sheets = excel_read::read_agenda(&xlsx_path).expect("Excel read");
    assert_eq!(sheets.contacts, Some(Vec::new()));
    assert_eq!(sheets.events, Some(Vec::new()));
    assert_eq!(sheets.tasks, Some(Vec::new()));
}

#[test]
fn importing_a_missing_file_reports_it() {
    let store = AgendaStore::in_memory();
    let temp_dir = tempdir().expect("temporary directory");
    let missing = temp_dir.path().join("nowhere.xlsx");

    let outcome = ExcelSync::new(&store)
        .import_from_excel(&missing)
        .expect("not an error");
    assert_eq!(outcome, ImportOutcome::MissingFile(missing));
    assert!(store.get_contacts(None).expect("contacts").is_empty());
}

#[test]
fn invalid_cell_aborts_import_before_any_write() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("broken.xlsx");

    let mut workbook = Workbook::new();
    let contacts = workbook.add_worksheet();
    contacts.set_name(CONTACTS_SHEET).expect("sheet named");
    for (col, header) in ["ID", "Name", "Surname", "Phone", "Email", "Address", "Notes"]
        .iter()
        .enumerate()
    {
        contacts
            .write_string(0, col as u16, *header)
            .expect("header written");
    }
    contacts.write_string(1, 1, "Dora").expect("cell written");

    let events = workbook.add_worksheet();
    events.set_name(EVENTS_SHEET).expect("sheet named");
    for (col, header) in EVENTS_LAYOUT.headers().enumerate() {
        events
            .write_string(0, col as u16, header)
            .expect("header written");
    }
    events.write_string(1, 1, "Party").expect("cell written");
    events.write_string(1, 3, "next friday").expect("cell written");
    workbook.save(&xlsx_path).expect("workbook saved");

    let store = AgendaStore::in_memory();
    let error = ExcelSync::new(&store)
        .import_from_excel(&xlsx_path)
        .expect_err("bad start time rejected");
    match error {
        ToolError::InvalidCell {
            sheet,
            row,
            column,
            value,
        } => {
            assert_eq!(sheet, EVENTS_SHEET);
            assert_eq!(row, 2);
            assert_eq!(column, "Start");
            assert_eq!(value, "next friday");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(store.get_contacts(None).expect("contacts").is_empty());
}

#[test]
fn missing_column_is_an_invalid_workbook() {
    let temp_dir = tempdir().expect("temporary directory");
    let xlsx_path = temp_dir.path().join("partial.xlsx");

    let mut workbook = Workbook::new();
    let tasks = workbook.add_worksheet();
    tasks.set_name(TASKS_SHEET).expect("sheet named");
    tasks.write_string(0, 0, "Title").expect("header written");
    tasks.write_string(1, 0, "Orphan").expect("cell written");
    workbook.save(&xlsx_path).expect("workbook saved");

    let store = AgendaStore::in_memory();
    let error = ExcelSync::new(&store)
        .import_from_excel(&xlsx_path)
        .expect_err("missing columns rejected");
    assert!(matches!(error, ToolError::InvalidWorkbook(_)));
}
