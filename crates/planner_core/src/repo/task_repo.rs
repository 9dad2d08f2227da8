//! Calendar task list persistence.
//!
//! # Invariants
//! - Ids handed out by `load_tasks` are stable: records stored without an
//!   id are assigned one and the list is written back before returning.

use crate::model::task::{new_task_id, CalendarTask, TaskId};
use crate::repo::kv_store::{KeyValueStore, RepoResult, TASKS_KEY};
use log::{info, warn};
use serde::Deserialize;

pub trait TaskRepository {
    fn load_tasks(&self) -> RepoResult<Vec<CalendarTask>>;
    fn save_tasks(&self, tasks: &[CalendarTask]) -> RepoResult<()>;
}

pub struct KvTaskRepository<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> KvTaskRepository<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

/// Stored task shape; older lists carry no `id`.
#[derive(Deserialize)]
struct TaskRecord {
    #[serde(default)]
    id: Option<TaskId>,
    title: String,
    date: String,
    #[serde(default)]
    description: String,
}

impl<S: KeyValueStore> TaskRepository for KvTaskRepository<S> {
    /// Missing or malformed lists load as empty.
    fn load_tasks(&self) -> RepoResult<Vec<CalendarTask>> {
        let Some(raw) = self.store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };
        let records: Vec<TaskRecord> = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(err) => {
                warn!("event=tasks_load module=repo status=error error_code=malformed_tasks error={err}");
                return Ok(Vec::new());
            }
        };

        let mut assigned = 0;
        let tasks: Vec<CalendarTask> = records
            .into_iter()
            .map(|record| {
                let id = match record.id.filter(|id| !id.trim().is_empty()) {
                    Some(id) => id,
                    None => {
                        assigned += 1;
                        new_task_id()
                    }
                };
                CalendarTask {
                    id,
                    title: record.title,
                    date: record.date,
                    description: record.description,
                }
            })
            .collect();

        if assigned > 0 {
            self.save_tasks(&tasks)?;
            info!("event=tasks_assign_ids module=repo status=ok assigned={assigned}");
        }
        Ok(tasks)
    }

    fn save_tasks(&self, tasks: &[CalendarTask]) -> RepoResult<()> {
        let raw = serde_json::to_string(tasks)?;
        self.store.set(TASKS_KEY, &raw)
    }
}
