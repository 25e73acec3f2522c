//! Settings commands: dotted-key access plus fixed commitment management.

use chrono::{NaiveDate, Weekday};
use clap::Subcommand;
use slotplan_core::{ClockTime, CommitmentWhen, Config, FixedCommitment};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Dotted config key (e.g. "schedule.slot_minutes", "engine.variant")
        key: String,
    },
    /// Set a config value
    Set {
        /// Dotted config key
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole config as JSON
    List,
    /// Reset config to defaults
    Reset,
    /// Manage fixed commitments (classes, shifts)
    Commitment {
        #[command(subcommand)]
        action: CommitmentAction,
    },
}

#[derive(Subcommand)]
pub enum CommitmentAction {
    /// Add a weekly or one-off commitment
    Add {
        /// Start time (HH:MM)
        start: ClockTime,
        /// End time (HH:MM)
        end: ClockTime,
        /// Weekday it repeats on (e.g. mon, Tuesday)
        #[arg(long, conflicts_with = "date", required_unless_present = "date")]
        day: Option<Weekday>,
        /// Single date it occurs on (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Display label
        #[arg(long)]
        label: Option<String>,
        /// Commitment ID (default: generated)
        #[arg(long)]
        id: Option<String>,
    },
    /// List commitments, one per line
    List,
    /// Remove a commitment by ID
    Remove {
        /// Commitment ID
        id: String,
    },
}

fn describe(c: &FixedCommitment) -> String {
    let when = match &c.when {
        CommitmentWhen::DayOfWeek(day) => format!("every {day}"),
        CommitmentWhen::Date(date) => date.to_string(),
    };
    let mut line = format!("{}  {}  {}-{}", c.id, when, c.start_time, c.end_time);
    if let Some(label) = &c.label {
        line.push_str("  ");
        line.push_str(label);
    }
    line
}

fn run_commitment(action: CommitmentAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;

    match action {
        CommitmentAction::Add {
            start,
            end,
            day,
            date,
            label,
            id,
        } => {
            let id = id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let mut commitment = match (day, date) {
                (_, Some(date)) => FixedCommitment::dated(id, date, start, end),
                (Some(day), None) => FixedCommitment::weekly(id, day, start, end),
                (None, None) => return Err("either --day or --date is required".into()),
            };
            if let Some(label) = label {
                commitment = commitment.with_label(label);
            }

            config.add_commitment(commitment.clone())?;
            config.save()?;
            println!("Commitment added: {}", describe(&commitment));
        }
        CommitmentAction::List => {
            for c in &config.fixed_schedules {
                println!("{}", describe(c));
            }
        }
        CommitmentAction::Remove { id } => match config.remove_commitment(&id) {
            Some(c) => {
                config.save()?;
                println!("Commitment removed: {}", c.id);
            }
            None => return Err(format!("commitment not found: {id}").into()),
        },
    }
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config
                .get(&key)
                .ok_or_else(|| format!("unknown key: {key}"))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            let stored = config.get(&key).unwrap_or(value);
            println!("{key} = {stored}");
        }
        ConfigAction::List => {
            let config = Config::load_or_default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
        ConfigAction::Commitment { action } => run_commitment(action)?,
    }
    Ok(())
}
