//! Task records and the in-memory task store.
//!
//! The store owns every [`Task`] and is the only place progress changes.
//! Each change is recorded as an [`Event`] that downstream consumers (the
//! reward tracker, a UI) drain and react to. The scheduler never sees the
//! store, only a [`TaskStore::snapshot`].

mod draft;

pub use draft::TaskDraft;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::events::Event;

/// Scheduling precedence of a task.
///
/// Any unrecognised value deserializes to [`Priority::Low`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Priority {
    High,
    Medium,
    #[default]
    Low,
}

impl Priority {
    /// Sort rank; lower ranks are scheduled first.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }

    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        };
        f.write_str(s)
    }
}

/// Kind of work. Descriptive only, it has no scheduling effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TaskType {
    #[default]
    Report,
    Memorize,
    Study,
    Other,
}

impl From<String> for TaskType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "report" => TaskType::Report,
            "memorize" => TaskType::Memorize,
            "study" => TaskType::Study,
            _ => TaskType::Other,
        }
    }
}

/// A unit of work with a deadline and an hour estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    #[serde(default, alias = "taskType")]
    pub task_type: TaskType,
    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(alias = "requiredTime", alias = "requiredHours")]
    pub required_hours: f64,
    #[serde(default)]
    pub priority: Priority,
    /// Percent complete, 0..=100.
    #[serde(default)]
    pub progress: u8,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        due_date: NaiveDate,
        required_hours: f64,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            task_type: TaskType::default(),
            due_date,
            required_hours,
            priority,
            progress: 0,
        }
    }

    pub fn with_progress(mut self, progress: u8) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_type(mut self, task_type: TaskType) -> Self {
        self.task_type = task_type;
        self
    }

    /// Hours left once reported progress is discounted.
    pub fn discounted_hours(&self) -> f64 {
        self.required_hours * (1.0 - f64::from(self.progress) / 100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= 100
    }

    /// Check the record-level contract the scheduler relies on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::invalid("id", "task id is empty"));
        }
        if self.name.trim().is_empty() {
            return Err(ValidationError::invalid("name", "task name is empty"));
        }
        if !self.required_hours.is_finite() || self.required_hours < 0.0 {
            return Err(ValidationError::invalid(
                "required_hours",
                format!("must be a non-negative number, got {}", self.required_hours),
            ));
        }
        if self.progress > 100 {
            return Err(ValidationError::invalid(
                "progress",
                format!("must be within 0..=100, got {}", self.progress),
            ));
        }
        Ok(())
    }
}

/// In-memory owner of task records.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    events: Vec<Event>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from previously exported tasks, rejecting malformed or
    /// duplicate records.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, ValidationError> {
        let mut store = Self::new();
        for task in tasks {
            task.validate()?;
            if store.get(&task.id).is_some() {
                return Err(ValidationError::invalid(
                    "id",
                    format!("duplicate task id '{}'", task.id),
                ));
            }
            store.tasks.push(task);
        }
        Ok(store)
    }

    /// Validate a draft and add it with a freshly generated id.
    pub fn add(&mut self, draft: TaskDraft) -> Result<&Task, ValidationError> {
        let task = draft.validate(uuid::Uuid::new_v4().to_string())?;
        tracing::debug!(task_id = %task.id, name = %task.name, "task added");
        self.events.push(Event::TaskAdded {
            task_id: task.id.clone(),
            at: Utc::now(),
        });
        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let index = self.tasks.iter().position(|t| t.id == id)?;
        let task = self.tasks.remove(index);
        self.events.push(Event::TaskRemoved {
            task_id: task.id.clone(),
            at: Utc::now(),
        });
        Some(task)
    }

    /// Set a task's progress. Decreases are accepted.
    pub fn update_progress(&mut self, id: &str, progress: u8) -> Result<Event, ValidationError> {
        if progress > 100 {
            return Err(ValidationError::invalid(
                "progress",
                format!("must be within 0..=100, got {progress}"),
            ));
        }

        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| ValidationError::UnknownTask(id.to_string()))?;

        let old_progress = task.progress;
        task.progress = progress;

        let event = Event::ProgressUpdated {
            task_id: task.id.clone(),
            old_progress,
            new_progress: progress,
            at: Utc::now(),
        };
        self.events.push(event.clone());
        Ok(event)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Owned copy of the current tasks, suitable as scheduler input.
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take all events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
