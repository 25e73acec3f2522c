use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use slotplan_core::storage::load_tasks;
use slotplan_core::{shortfalls, Config, EngineVariant, Scheduler, TaskStore};

use crate::render;

#[derive(Subcommand)]
pub enum ScheduleAction {
    /// Allocate tasks from a snapshot file into slots
    Build {
        /// JSON task snapshot
        #[arg(long)]
        tasks: PathBuf,
        /// Any date in the first week of the plan (default: today)
        #[arg(long)]
        anchor: Option<NaiveDate>,
        /// Engine variant: task-level or hourly (default: from config)
        #[arg(long)]
        variant: Option<EngineVariant>,
        /// Print the grid as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the settings the engine would run with
    Settings,
}

pub fn run(action: ScheduleAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    match action {
        ScheduleAction::Build {
            tasks,
            anchor,
            variant,
            json,
        } => {
            let settings = config.settings()?;
            let engine = match variant {
                Some(v) => config.scheduler_config_for(v),
                None => config.scheduler_config(),
            };
            // Validates the snapshot the same way the store does on load.
            let store = TaskStore::from_tasks(load_tasks(&tasks)?)?;
            let snapshot = store.snapshot();
            let anchor = anchor.unwrap_or_else(|| Local::now().date_naive());

            let scheduler = Scheduler::with_config(engine);
            tracing::debug!(%anchor, tasks = snapshot.len(), config = ?scheduler.config(), "building schedule");

            let grid = scheduler.build_grid(&settings, &snapshot, anchor)?;
            let missing = shortfalls(&grid, &snapshot, scheduler.config().remaining);

            if json {
                let out = serde_json::json!({
                    "grid": grid,
                    "shortfalls": missing,
                });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                print!("{}", render::grid_table(&grid));
                for line in render::shortfall_lines(&missing) {
                    println!("{line}");
                }
            }
        }
        ScheduleAction::Settings => {
            let out = serde_json::json!({
                "settings": config.settings()?,
                "engine": config.scheduler_config(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
    }
    Ok(())
}
