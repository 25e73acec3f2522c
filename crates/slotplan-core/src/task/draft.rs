//! Raw task input as typed into a form, before validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Priority, Task, TaskType};
use crate::error::ValidationError;

/// Unvalidated task fields. Everything is text, the way a form submits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub name: String,
    #[serde(default)]
    pub task_type: Option<String>,
    pub due_date: String,
    pub required_hours: String,
    #[serde(default)]
    pub priority: Option<String>,
}

impl TaskDraft {
    /// Turn the draft into a [`Task`] with the given id and zero progress.
    ///
    /// Priority defaults to medium and the type to report when left blank.
    pub fn validate(self, id: String) -> Result<Task, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::invalid("name", "required"));
        }

        let due_date = NaiveDate::parse_from_str(self.due_date.trim(), "%Y-%m-%d").map_err(|_| {
            ValidationError::invalid(
                "due_date",
                format!("'{}' is not a YYYY-MM-DD date", self.due_date),
            )
        })?;

        let required_hours: f64 = self.required_hours.trim().parse().map_err(|_| {
            ValidationError::invalid(
                "required_hours",
                format!("'{}' is not a number", self.required_hours),
            )
        })?;
        if !required_hours.is_finite() || required_hours < 0.0 {
            return Err(ValidationError::invalid(
                "required_hours",
                format!("must be a non-negative number, got {required_hours}"),
            ));
        }

        let priority = match self.priority.as_deref().map(str::trim) {
            None | Some("") => Priority::Medium,
            Some(p) => Priority::parse_lenient(p),
        };

        let task_type = self
            .task_type
            .filter(|t| !t.trim().is_empty())
            .map(TaskType::from)
            .unwrap_or_default();

        Ok(Task::new(id, name, due_date, required_hours, priority).with_type(task_type))
    }
}
