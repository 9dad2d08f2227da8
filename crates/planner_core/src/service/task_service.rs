//! Calendar task use-case service.
//!
//! # Invariants
//! - A task needs a non-blank title and a `YYYY-MM-DD` date; the time
//!   (`HH:MM`) is optional.
//! - Tasks sharing title and date stay independent: every operation is
//!   keyed by id only.

use crate::model::task::{CalendarEvent, CalendarTask, TaskId};
use crate::repo::kv_store::RepoError;
use crate::repo::task_repo::TaskRepository;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date regex"));
static TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid time regex"));

#[derive(Debug)]
pub enum TaskServiceError {
    /// Title is blank after trim.
    MissingTitle,
    /// Date is not `YYYY-MM-DD`.
    InvalidDate(String),
    /// Time is not `HH:MM`.
    InvalidTime(String),
    Repo(RepoError),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTitle => write!(f, "task title must not be blank"),
            Self::InvalidDate(value) => write!(f, "invalid task date: `{value}`"),
            Self::InvalidTime(value) => write!(f, "invalid task time: `{value}`"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// User input for creating or replacing a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// Optional `HH:MM`.
    pub time: Option<String>,
    pub description: String,
}

impl TaskInput {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and appends a new task. Returns the stored record.
    pub fn add_task(&self, input: &TaskInput) -> Result<CalendarTask, TaskServiceError> {
        let (title, date) = validate_input(input)?;
        let mut task = CalendarTask::new(title, date);
        task.description = input.description.trim().to_string();

        let mut tasks = self.repo.load_tasks()?;
        tasks.push(task.clone());
        self.repo.save_tasks(&tasks)?;
        info!("event=task_add module=service status=ok tasks={}", tasks.len());
        Ok(task)
    }

    pub fn list_tasks(&self) -> Result<Vec<CalendarTask>, TaskServiceError> {
        Ok(self.repo.load_tasks()?)
    }

    /// Tasks scheduled on `day` (`YYYY-MM-DD`), in stored order.
    pub fn tasks_on(&self, day: &str) -> Result<Vec<CalendarTask>, TaskServiceError> {
        let tasks = self.repo.load_tasks()?;
        Ok(tasks.into_iter().filter(|task| task.day() == day).collect())
    }

    pub fn get_task(&self, task_id: &str) -> Result<Option<CalendarTask>, TaskServiceError> {
        let tasks = self.repo.load_tasks()?;
        Ok(tasks.into_iter().find(|task| task.id == task_id))
    }

    /// Replaces a task's fields, keeping its id. `None` when unknown.
    pub fn update_task(
        &self,
        task_id: &str,
        input: &TaskInput,
    ) -> Result<Option<CalendarTask>, TaskServiceError> {
        let (title, date) = validate_input(input)?;
        let mut tasks = self.repo.load_tasks()?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == task_id) else {
            debug!("event=task_update module=service status=skip reason=task_not_found");
            return Ok(None);
        };
        task.title = title;
        task.date = date;
        task.description = input.description.trim().to_string();
        let updated = task.clone();
        self.repo.save_tasks(&tasks)?;
        Ok(Some(updated))
    }

    /// Deletes one task by id. Returns `false` when no task matched.
    pub fn delete_task(&self, task_id: &str) -> Result<bool, TaskServiceError> {
        let mut tasks = self.repo.load_tasks()?;
        let before = tasks.len();
        tasks.retain(|task| task.id != task_id);
        if tasks.len() == before {
            debug!("event=task_delete module=service status=skip reason=task_not_found");
            return Ok(false);
        }
        self.repo.save_tasks(&tasks)?;
        info!("event=task_delete module=service status=ok tasks={}", tasks.len());
        Ok(true)
    }

    /// Calendar widget feed.
    pub fn calendar_events(&self) -> Result<Vec<CalendarEvent>, TaskServiceError> {
        let tasks = self.repo.load_tasks()?;
        Ok(tasks.iter().map(CalendarEvent::from).collect())
    }

    /// Ids of every stored task, for callers tracking id reuse.
    pub fn task_ids(&self) -> Result<Vec<TaskId>, TaskServiceError> {
        let tasks = self.repo.load_tasks()?;
        Ok(tasks.into_iter().map(|task| task.id).collect())
    }
}

/// Returns the trimmed title and the combined `date[THH:MM]` value.
fn validate_input(input: &TaskInput) -> Result<(String, String), TaskServiceError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(TaskServiceError::MissingTitle);
    }
    let date = input.date.trim();
    if !DATE_RE.is_match(date) {
        return Err(TaskServiceError::InvalidDate(date.to_string()));
    }
    let datetime = match input.time.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(time) if TIME_RE.is_match(time) => format!("{date}T{time}"),
        Some(time) => return Err(TaskServiceError::InvalidTime(time.to_string())),
        None => date.to_string(),
    };
    Ok((title.to_string(), datetime))
}

#[cfg(test)]
mod tests {
    use super::{validate_input, TaskInput, TaskServiceError};

    #[test]
    fn time_is_appended_to_date() {
        let (_, date) = validate_input(&TaskInput::new("Call", "2025-03-01").at("14:05")).unwrap();
        assert_eq!(date, "2025-03-01T14:05");
    }

    #[test]
    fn blank_time_means_all_day() {
        let (_, date) = validate_input(&TaskInput::new("Call", "2025-03-01").at("  ")).unwrap();
        assert_eq!(date, "2025-03-01");
    }

    #[test]
    fn invalid_fields_are_rejected() {
        assert!(matches!(
            validate_input(&TaskInput::new("  ", "2025-03-01")),
            Err(TaskServiceError::MissingTitle)
        ));
        assert!(matches!(
            validate_input(&TaskInput::new("x", "2025-13-01")),
            Err(TaskServiceError::InvalidDate(_))
        ));
        assert!(matches!(
            validate_input(&TaskInput::new("x", "2025-03-01").at("25:00")),
            Err(TaskServiceError::InvalidTime(_))
        ));
    }
}
