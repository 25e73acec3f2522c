use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every task store change produces an Event.
/// Consumers drain them from the store; the scheduler never sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskAdded {
        task_id: String,
        at: DateTime<Utc>,
    },
    TaskRemoved {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// Progress changed. `new_progress` may be lower than `old_progress`.
    ProgressUpdated {
        task_id: String,
        old_progress: u8,
        new_progress: u8,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn task_id(&self) -> &str {
        match self {
            Event::TaskAdded { task_id, .. }
            | Event::TaskRemoved { task_id, .. }
            | Event::ProgressUpdated { task_id, .. } => task_id,
        }
    }
}
