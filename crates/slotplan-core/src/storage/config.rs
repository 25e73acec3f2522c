//! TOML-based application configuration.
//!
//! Holds the settings store's state:
//! - Slot granularity and the daily window (ideal hours or wake/bed)
//! - Week start convention
//! - Fixed commitments
//! - Which engine variant to run, with optional overrides
//!
//! Configuration is stored at `~/.config/slotplan/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::data_dir;
use crate::error::{ConfigError, Result, ValidationError};
use crate::schedule::{ClockTime, DailyWindow, FixedCommitment, Settings, WeekStart};
use crate::scheduler::{RemainingWork, SchedulerConfig};

/// Slot grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,
    #[serde(default = "default_daily_ideal_hours")]
    pub daily_ideal_hours: f64,
    /// When both wake and bed are set they replace `daily_ideal_hours`.
    #[serde(default)]
    pub wake_time: Option<ClockTime>,
    #[serde(default)]
    pub bed_time: Option<ClockTime>,
    #[serde(default)]
    pub week_start: WeekStart,
}

/// Preset allocator behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EngineVariant {
    /// Two weeks, net daily hours, progress-discounted work.
    #[default]
    TaskLevel,
    /// One week, fixed commitments blocked, raw required hours.
    Hourly,
}

impl FromStr for EngineVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "task-level" | "task_level" => Ok(EngineVariant::TaskLevel),
            "hourly" => Ok(EngineVariant::Hourly),
            other => Err(ValidationError::invalid(
                "variant",
                format!("expected task-level or hourly, got '{other}'"),
            )),
        }
    }
}

/// Engine configuration. Unset overrides fall back to the variant preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub variant: EngineVariant,
    #[serde(default)]
    pub horizon_days: Option<u32>,
    #[serde(default)]
    pub exclude_fixed: Option<bool>,
    #[serde(default)]
    pub remaining: Option<RemainingWork>,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/slotplan/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub fixed_schedules: Vec<FixedCommitment>,
}

fn default_slot_minutes() -> u32 {
    60
}
fn default_daily_ideal_hours() -> f64 {
    4.0
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            slot_minutes: default_slot_minutes(),
            daily_ideal_hours: default_daily_ideal_hours(),
            wake_time: None,
            bed_time: None,
            week_start: WeekStart::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    // Unset optional: accept JSON literals, else treat as text.
                    serde_json::Value::Null => serde_json::from_str(value)
                        .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content).map_err(ConfigError::from)?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value in memory. The result must still yield valid settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// into the field's type, or if the new settings fail validation.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.settings()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value and persist it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// Daily window implied by the schedule section.
    pub fn window(&self) -> DailyWindow {
        match (self.schedule.wake_time, self.schedule.bed_time) {
            (Some(wake), Some(bed)) => DailyWindow::WakeBed { wake, bed },
            _ => DailyWindow::IdealHours {
                hours: self.schedule.daily_ideal_hours,
            },
        }
    }

    /// Validated engine settings.
    pub fn settings(&self) -> std::result::Result<Settings, ValidationError> {
        let settings = Settings {
            window: self.window(),
            slot_minutes: self.schedule.slot_minutes,
            fixed_schedules: self.fixed_schedules.clone(),
            week_start: self.schedule.week_start,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Engine configuration for the configured variant, with overrides applied.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        self.scheduler_config_for(self.engine.variant)
    }

    /// Same as [`Config::scheduler_config`] but for an explicit variant.
    pub fn scheduler_config_for(&self, variant: EngineVariant) -> SchedulerConfig {
        let mut config = match variant {
            EngineVariant::TaskLevel => SchedulerConfig::task_level(),
            EngineVariant::Hourly => SchedulerConfig::hourly(),
        };
        if let Some(days) = self.engine.horizon_days {
            config.horizon_days = days;
        }
        if let Some(exclude) = self.engine.exclude_fixed {
            config.exclude_fixed = exclude;
        }
        if let Some(remaining) = self.engine.remaining {
            config.remaining = remaining;
        }
        config
    }

    /// Add a fixed commitment. Ids must be unique and the resulting
    /// settings must still validate.
    pub fn add_commitment(&mut self, commitment: FixedCommitment) -> Result<()> {
        if self.fixed_schedules.iter().any(|c| c.id == commitment.id) {
            return Err(ConfigError::InvalidValue {
                key: "fixed_schedules".to_string(),
                message: format!("commitment '{}' already exists", commitment.id),
            }
            .into());
        }

        let mut updated = self.clone();
        updated.fixed_schedules.push(commitment);
        updated.settings()?;
        *self = updated;
        Ok(())
    }

    /// Remove a fixed commitment by id.
    pub fn remove_commitment(&mut self, id: &str) -> Option<FixedCommitment> {
        let index = self.fixed_schedules.iter().position(|c| c.id == id)?;
        Some(self.fixed_schedules.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.schedule.slot_minutes, 60);
        assert_eq!(cfg.schedule.daily_ideal_hours, 4.0);
        assert_eq!(cfg.schedule.week_start, WeekStart::Sunday);
        assert_eq!(cfg.engine.variant, EngineVariant::TaskLevel);
        assert!(cfg.fixed_schedules.is_empty());
        assert_eq!(cfg.scheduler_config(), SchedulerConfig::task_level());
    }

    #[test]
    fn parses_hand_written_toml() {
        let toml_str = r#"
            [schedule]
            slot_minutes = 30
            wake_time = "07:00"
            bed_time = "23:00"
            week_start = "monday"

            [engine]
            variant = "hourly"
            horizon_days = 14

            [[fixed_schedules]]
            id = "lecture"
            label = "Linear algebra"
            when = { day_of_week = "Tue" }
            start_time = "09:00"
            end_time = "10:30"
        "#;
        let cfg: Config = toml::from_str(toml_str).unwrap();

        let settings = cfg.settings().unwrap();
        assert_eq!(settings.slot_minutes, 30);
        assert_eq!(settings.window.capacity_minutes(), 16.0 * 60.0);
        assert_eq!(settings.week_start, WeekStart::Monday);
        assert_eq!(settings.fixed_schedules.len(), 1);
        assert_eq!(
            settings.fixed_schedules[0].when,
            crate::schedule::CommitmentWhen::DayOfWeek(Weekday::Tue)
        );

        let engine = cfg.scheduler_config();
        assert_eq!(engine.horizon_days, 14);
        assert!(engine.exclude_fixed);
        assert_eq!(engine.remaining, RemainingWork::RawRequired);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("schedule.slot_minutes").as_deref(), Some("60"));
        assert_eq!(cfg.get("engine.variant").as_deref(), Some("task-level"));
        assert_eq!(cfg.get("schedule.wake_time").as_deref(), Some("null"));
        assert!(cfg.get("schedule.missing_key").is_none());
    }

    #[test]
    fn set_value_updates_number_and_optional_fields() {
        let mut cfg = Config::default();
        cfg.set_value("schedule.slot_minutes", "30").unwrap();
        cfg.set_value("schedule.wake_time", "08:00").unwrap();
        cfg.set_value("schedule.bed_time", "12:00").unwrap();
        cfg.set_value("engine.horizon_days", "7").unwrap();

        assert_eq!(cfg.schedule.slot_minutes, 30);
        assert_eq!(cfg.schedule.wake_time, ClockTime::new(8, 0));
        assert_eq!(cfg.engine.horizon_days, Some(7));
        assert_eq!(cfg.settings().unwrap().window.capacity_minutes(), 240.0);
    }

    #[test]
    fn set_value_rejects_unknown_and_invalid() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("schedule.nonexistent", "1"),
            Err(crate::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set_value("schedule.slot_minutes", "abc").is_err());
        // 45 does not divide an hour; the config stays unchanged.
        assert!(cfg.set_value("schedule.slot_minutes", "45").is_err());
        assert_eq!(cfg.schedule.slot_minutes, 60);
    }

    #[test]
    fn set_value_rejects_window_the_engine_cannot_build() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("schedule.daily_ideal_hours", "30").is_err());
        assert_eq!(cfg.schedule.daily_ideal_hours, 4.0);

        cfg.set_value("schedule.daily_ideal_hours", "24").unwrap();
        let settings = cfg.settings().unwrap();
        let anchor = chrono::NaiveDate::from_ymd_opt(2025, 2, 2).unwrap();
        assert!(crate::build_grid(&settings, &[], anchor).is_ok());

        cfg.set_value("schedule.wake_time", "22:00").unwrap();
        assert!(cfg.set_value("schedule.bed_time", "02:00").is_err());
        assert_eq!(cfg.schedule.bed_time, None);
    }

    #[test]
    fn commitments_add_and_remove() {
        let mut cfg = Config::default();
        let gym = FixedCommitment::weekly(
            "gym",
            Weekday::Thu,
            ClockTime::new(18, 0).unwrap(),
            ClockTime::new(19, 0).unwrap(),
        );

        cfg.add_commitment(gym.clone()).unwrap();
        assert!(cfg.add_commitment(gym.clone()).is_err());

        let backwards = FixedCommitment::weekly(
            "late",
            Weekday::Fri,
            ClockTime::new(19, 0).unwrap(),
            ClockTime::new(18, 0).unwrap(),
        );
        assert!(matches!(
            cfg.add_commitment(backwards),
            Err(crate::CoreError::Validation(_))
        ));
        assert_eq!(cfg.fixed_schedules, vec![gym.clone()]);

        assert_eq!(cfg.remove_commitment("gym"), Some(gym));
        assert_eq!(cfg.remove_commitment("gym"), None);
        assert!(cfg.fixed_schedules.is_empty());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.schedule.daily_ideal_hours = 6.5;
        cfg.fixed_schedules.push(FixedCommitment::weekly(
            "gym",
            Weekday::Thu,
            ClockTime::new(18, 0).unwrap(),
            ClockTime::new(19, 0).unwrap(),
        ));

        cfg.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn variant_parsing() {
        assert_eq!("hourly".parse::<EngineVariant>().unwrap(), EngineVariant::Hourly);
        assert_eq!("task-level".parse::<EngineVariant>().unwrap(), EngineVariant::TaskLevel);
        assert!("daily".parse::<EngineVariant>().is_err());
    }
}
