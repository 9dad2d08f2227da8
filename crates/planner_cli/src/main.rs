//! CLI smoke entry point.
//!
//! Without arguments, prints core linkage info. With a store path, loads
//! the note document and prints one line per page.

use planner_core::db::open_db;
use planner_core::{DocumentRepository, KvDocumentRepository, SqliteKvStore};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("planner_core ping={}", planner_core::ping());
    println!("planner_core version={}", planner_core::core_version());

    let Some(path) = std::env::args().nth(1) else {
        return ExitCode::SUCCESS;
    };

    let conn = match open_db(&path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open store `{path}`: {err}");
            return ExitCode::FAILURE;
        }
    };
    let repo = KvDocumentRepository::new(SqliteKvStore::new(&conn));
    let document = repo.load();
    for page in document.pages() {
        let marker = if document.active_page_id() == Some(page.id.as_str()) {
            '*'
        } else {
            ' '
        };
        println!(
            "{marker} {} blocks={} updated={} title={}",
            page.id,
            page.blocks.len(),
            page.updated,
            page.title
        );
    }
    ExitCode::SUCCESS
}
