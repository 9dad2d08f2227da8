//! Core logic for the planner: block notes, calendar tasks, table grid and
//! dashboard widgets, persisted to a key-value store.
//! This crate is the single source of truth for planner invariants.

pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod widgets;

pub use editor::markdown::{apply_live_markdown, MarkdownContext, MarkdownMatch, MarkdownStyle};
pub use editor::surface::{FragmentSurface, InlineFormat, Selection, TextSurface};
pub use editor::view::{BlockElement, BlockView, MemoryView};
pub use editor::{BlockEditor, EditState, EditorConfig, EditorEvent};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::block::{Block, BlockId, BlockType};
pub use model::document::Document;
pub use model::grid::{GridError, TableGrid};
pub use model::page::{EditorSettings, Page, PageId};
pub use model::task::{CalendarEvent, CalendarTask, TaskId};
pub use repo::document_repo::{DocumentRepository, KvDocumentRepository};
pub use repo::grid_repo::{GridRepository, KvGridRepository};
pub use repo::kv_store::{KeyValueStore, RepoError, RepoResult, SqliteKvStore};
pub use repo::task_repo::{KvTaskRepository, TaskRepository};
pub use service::grid_service::{ClickOutcome, DeleteMode, GridService, GridServiceError};
pub use service::task_service::{TaskInput, TaskService, TaskServiceError};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
