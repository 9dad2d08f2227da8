use planner_core::db::open_db_in_memory;
use planner_core::{
    KeyValueStore, KvTaskRepository, SqliteKvStore, TaskInput, TaskService, TaskServiceError,
};

#[test]
fn identical_tasks_stay_independently_deletable() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(KvTaskRepository::new(SqliteKvStore::new(&conn)));
    let input = TaskInput::new("Team meeting", "2025-03-01");

    let first = service.add_task(&input).unwrap();
    let second = service.add_task(&input).unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(service.tasks_on("2025-03-01").unwrap().len(), 2);

    assert!(service.delete_task(&first.id).unwrap());
    let remaining = service.list_tasks().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    assert!(!service.delete_task(&first.id).unwrap());

    let third = service.add_task(&input).unwrap();
    assert_ne!(third.id, first.id);
    assert_ne!(third.id, second.id);
}

#[test]
fn timed_task_feeds_calendar_event() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(KvTaskRepository::new(SqliteKvStore::new(&conn)));

    let task = service
        .add_task(
            &TaskInput::new("  Dentist ", "2025-04-10")
                .at("09:30")
                .with_description("bring forms"),
        )
        .unwrap();
    assert_eq!(task.title, "Dentist");
    assert_eq!(task.day(), "2025-04-10");
    assert_eq!(task.time(), Some("09:30"));

    let events = service.calendar_events().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, task.id);
    assert_eq!(events[0].title, "Dentist");
    assert_eq!(events[0].start, "2025-04-10T09:30");
    assert_eq!(events[0].description, "bring forms");
}

#[test]
fn invalid_input_is_rejected_before_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(KvTaskRepository::new(SqliteKvStore::new(&conn)));

    let blank = service.add_task(&TaskInput::new("   ", "2025-03-01"));
    assert!(matches!(blank, Err(TaskServiceError::MissingTitle)));
    let bad_date = service.add_task(&TaskInput::new("Call", "2025-13-01"));
    assert!(matches!(bad_date, Err(TaskServiceError::InvalidDate(_))));
    let bad_time = service.add_task(&TaskInput::new("Call", "2025-03-01").at("25:00"));
    assert!(matches!(bad_time, Err(TaskServiceError::InvalidTime(_))));

    assert!(service.list_tasks().unwrap().is_empty());
}

#[test]
fn update_keeps_id_and_unknown_ids_are_reported() {
    let conn = open_db_in_memory().unwrap();
    let service = TaskService::new(KvTaskRepository::new(SqliteKvStore::new(&conn)));
    let task = service
        .add_task(&TaskInput::new("Draft", "2025-05-02"))
        .unwrap();

    let updated = service
        .update_task(&task.id, &TaskInput::new("Final", "2025-05-03").at("14:00"))
        .unwrap()
        .unwrap();
    assert_eq!(updated.id, task.id);
    assert_eq!(updated.date, "2025-05-03T14:00");
    assert_eq!(service.get_task(&task.id).unwrap(), Some(updated));

    let missing = service
        .update_task("no-such-task", &TaskInput::new("X", "2025-05-03"))
        .unwrap();
    assert_eq!(missing, None);
}

#[test]
fn legacy_tasks_without_ids_get_stable_distinct_ids() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store
        .set(
            "calendarTasks",
            r#"[{"title":"Team meeting","date":"2025-03-01"},{"title":"Team meeting","date":"2025-03-01"}]"#,
        )
        .unwrap();
    let service = TaskService::new(KvTaskRepository::new(&store));

    let ids = service.task_ids().unwrap();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert_eq!(service.task_ids().unwrap(), ids);

    let raw = store.get("calendarTasks").unwrap().unwrap();
    assert!(raw.contains(&ids[0]));
    assert!(raw.contains(&ids[1]));
}

#[test]
fn legacy_task_can_be_deleted_by_listed_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store
        .set(
            "calendarTasks",
            r#"[{"title":"Team meeting","date":"2025-03-01"},{"title":"Team meeting","date":"2025-03-01"}]"#,
        )
        .unwrap();
    let service = TaskService::new(KvTaskRepository::new(&store));

    let listed = service.list_tasks().unwrap();
    assert_eq!(
        service.get_task(&listed[0].id).unwrap().as_ref(),
        Some(&listed[0])
    );
    assert!(service.delete_task(&listed[0].id).unwrap());

    let remaining = service.list_tasks().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, listed[1].id);
}

#[test]
fn malformed_task_list_loads_empty() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    store.set("calendarTasks", "{broken").unwrap();
    let service = TaskService::new(KvTaskRepository::new(&store));

    assert!(service.list_tasks().unwrap().is_empty());
}
