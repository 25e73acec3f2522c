//! Core error types for slotplan-core.
//!
//! The engine only ever fails with [`SchedulerError`]. Malformed task and
//! commitment records are rejected earlier, at the store boundary, with
//! [`ValidationError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for slotplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Scheduler refused to build a grid
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by the slot allocation engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Slot granularity, capacity or horizon cannot produce a grid.
    #[error("Invalid scheduler configuration for '{field}': {message}")]
    InvalidConfig { field: String, message: String },
}

impl SchedulerError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        SchedulerError::InvalidConfig {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown dotted configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors raised at the settings/task store boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A record field is missing or malformed
    #[error("Invalid input for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// No task with this id exists in the store
    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
