use planner_core::db::open_db_in_memory;
use planner_core::{
    ClickOutcome, DeleteMode, GridService, KvGridRepository, SqliteKvStore,
};

fn reload(conn: &rusqlite::Connection) -> Vec<Vec<String>> {
    let service = GridService::new(KvGridRepository::new(SqliteKvStore::new(conn))).unwrap();
    service.grid().rows().to_vec()
}

#[test]
fn rows_columns_and_cells_persist() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GridService::new(KvGridRepository::new(SqliteKvStore::new(&conn))).unwrap();

    service.add_row().unwrap();
    service.add_row().unwrap();
    service.add_column().unwrap();
    service.set_cell(1, 1, "done").unwrap();

    assert_eq!(
        reload(&conn),
        vec![
            vec![String::new(), String::new()],
            vec![String::new(), "done".to_string()],
        ]
    );
}

#[test]
fn armed_row_delete_fires_once() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GridService::new(KvGridRepository::new(SqliteKvStore::new(&conn))).unwrap();
    for _ in 0..3 {
        service.add_row().unwrap();
    }
    service.set_cell(2, 0, "last").unwrap();

    service.arm_row_delete();
    assert_eq!(service.mode(), DeleteMode::Row);
    assert_eq!(service.click(0, 0).unwrap(), ClickOutcome::RowDeleted(0));
    assert_eq!(service.mode(), DeleteMode::Off);
    assert_eq!(
        service.click(0, 0).unwrap(),
        ClickOutcome::EditCell { row: 0, column: 0 }
    );

    assert_eq!(reload(&conn), vec![vec![String::new()], vec!["last".to_string()]]);
}

#[test]
fn armed_column_delete_removes_column_from_every_row() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GridService::new(KvGridRepository::new(SqliteKvStore::new(&conn))).unwrap();
    service.add_row().unwrap();
    service.add_row().unwrap();
    service.add_column().unwrap();
    service.set_cell(0, 1, "keep").unwrap();

    service.arm_column_delete();
    assert_eq!(service.click(1, 0).unwrap(), ClickOutcome::ColumnDeleted(0));
    assert_eq!(
        reload(&conn),
        vec![vec!["keep".to_string()], vec![String::new()]]
    );
}

#[test]
fn click_outside_grid_misses_and_disarms() {
    let conn = open_db_in_memory().unwrap();
    let mut service = GridService::new(KvGridRepository::new(SqliteKvStore::new(&conn))).unwrap();
    service.add_row().unwrap();

    service.arm_row_delete();
    assert_eq!(service.click(9, 0).unwrap(), ClickOutcome::Missed);
    assert_eq!(service.mode(), DeleteMode::Off);
    assert_eq!(service.click(0, 5).unwrap(), ClickOutcome::Missed);
    assert_eq!(service.grid().row_count(), 1);

    assert!(service.set_cell(4, 0, "x").is_err());
}
