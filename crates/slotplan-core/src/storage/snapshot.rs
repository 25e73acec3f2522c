//! JSON task snapshot files.
//!
//! A snapshot is a plain JSON array of tasks. It is how the CLI hands a task
//! list to the scheduler; the library itself keeps nothing on disk.

use std::path::Path;

use crate::error::Result;
use crate::task::Task;

/// Read a snapshot file.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a JSON task array.
pub fn load_tasks(path: &Path) -> Result<Vec<Task>> {
    let content = std::fs::read_to_string(path)?;
    let tasks: Vec<Task> = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), count = tasks.len(), "loaded task snapshot");
    Ok(tasks)
}

/// Like [`load_tasks`], but a missing file is an empty list.
pub fn load_tasks_or_empty(path: &Path) -> Result<Vec<Task>> {
    if path.exists() {
        load_tasks(path)
    } else {
        Ok(Vec::new())
    }
}

/// Write tasks as a pretty-printed JSON array.
pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let content = serde_json::to_string_pretty(tasks)?;
    std::fs::write(path, content)?;
    Ok(())
}
