mod config;
pub mod snapshot;

pub use config::{Config, EngineConfig, EngineVariant, ScheduleConfig};
pub use snapshot::{load_tasks, load_tasks_or_empty, save_tasks};

use std::path::PathBuf;

use crate::error::Result;

/// Returns the configuration directory.
///
/// `SLOTPLAN_HOME` wins when set. Otherwise `~/.config/slotplan[-dev]/`,
/// where `SLOTPLAN_ENV=dev` selects the development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("SLOTPLAN_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("SLOTPLAN_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("slotplan-dev")
            } else {
                base_dir.join("slotplan")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
