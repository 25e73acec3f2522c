//! Task snapshot commands for CLI.
//!
//! Each command loads a JSON snapshot into a [`TaskStore`], applies one
//! change, reports the resulting events and writes the snapshot back.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use slotplan_core::storage::{load_tasks, load_tasks_or_empty, save_tasks};
use slotplan_core::{RewardTracker, TaskDraft, TaskStore};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a snapshot file (created if missing)
    Add {
        /// JSON task snapshot
        file: PathBuf,
        /// Task name
        name: String,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,
        /// Required hours of work
        #[arg(long)]
        hours: String,
        /// high, medium or low (default: medium)
        #[arg(long)]
        priority: Option<String>,
        /// report, memorize, study or other (default: report)
        #[arg(long = "type")]
        task_type: Option<String>,
    },
    /// List tasks in a snapshot file
    List {
        /// JSON task snapshot
        file: PathBuf,
        /// Hide tasks already at 100%
        #[arg(long)]
        open: bool,
    },
    /// Remove a task
    Remove {
        /// JSON task snapshot
        file: PathBuf,
        /// Task ID
        id: String,
    },
    /// Report progress (0-100) and show the reward
    Progress {
        /// JSON task snapshot
        file: PathBuf,
        /// Task ID
        id: String,
        /// Percent complete
        percent: u8,
    },
}

fn open_store(file: &Path) -> Result<TaskStore, Box<dyn std::error::Error>> {
    Ok(TaskStore::from_tasks(load_tasks(file)?)?)
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TaskAction::Add {
            file,
            name,
            due,
            hours,
            priority,
            task_type,
        } => {
            let mut store = TaskStore::from_tasks(load_tasks_or_empty(&file)?)?;
            let task = store
                .add(TaskDraft {
                    name,
                    task_type,
                    due_date: due,
                    required_hours: hours,
                    priority,
                })?
                .clone();
            save_tasks(&file, store.tasks())?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { file, open } => {
            let store = open_store(&file)?;
            let listed: Vec<_> = store
                .tasks()
                .iter()
                .filter(|t| !open || !t.is_complete())
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        TaskAction::Remove { file, id } => {
            let mut store = open_store(&file)?;
            match store.remove(&id) {
                Some(task) => {
                    save_tasks(&file, store.tasks())?;
                    println!("Task removed: {}", task.id);
                }
                None => return Err(format!("task not found: {id}").into()),
            }
        }
        TaskAction::Progress { file, id, percent } => {
            let mut store = open_store(&file)?;
            store.update_progress(&id, percent)?;
            save_tasks(&file, store.tasks())?;

            let mut tracker = RewardTracker::new();
            for reward in tracker.observe_all(&store.drain_events()) {
                println!("{}", reward.message);
                if reward.points_awarded > 0 {
                    println!("points: +{}", reward.points_awarded);
                }
            }
        }
    }
    Ok(())
}
