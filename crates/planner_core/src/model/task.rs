//! Calendar task model.
//!
//! # Invariants
//! - `date` is `YYYY-MM-DD` or `YYYY-MM-DDTHH:MM`.
//! - Every task carries an id; legacy records without one are given ids
//!   by the task repository, which writes them back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque task identifier; never reused once assigned.
pub type TaskId = String;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarTask {
    pub id: TaskId,
    pub title: String,
    /// Day, optionally followed by `T` and a wall-clock time.
    pub date: String,
    #[serde(default)]
    pub description: String,
}

impl CalendarTask {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            id: new_task_id(),
            title: title.into(),
            date: date.into(),
            description: String::new(),
        }
    }

    /// The `YYYY-MM-DD` part of `date`.
    pub fn day(&self) -> &str {
        self.date.split('T').next().unwrap_or(&self.date)
    }

    /// The `HH:MM` part of `date`, when the task is timed.
    pub fn time(&self) -> Option<&str> {
        self.date.split_once('T').map(|(_, time)| time)
    }
}

/// Calendar-widget projection of a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub id: TaskId,
    pub title: String,
    pub start: String,
    pub description: String,
}

impl From<&CalendarTask> for CalendarEvent {
    fn from(task: &CalendarTask) -> Self {
        Self {
            id: task.id.clone(),
            title: task.title.clone(),
            start: task.date.clone(),
            description: task.description.clone(),
        }
    }
}

pub fn new_task_id() -> TaskId {
    Uuid::new_v4().to_string()
}
