//! # SlotPlan Core Library
//!
//! This library provides the core logic for SlotPlan, a personal time-block
//! scheduler. Free time across a multi-day horizon is cut into equal slots
//! and task work is placed greedily before each task's deadline.
//! The CLI is a thin presentation layer over the same library.
//!
//! ## Architecture
//!
//! - **Scheduler**: a pure function from settings and a task snapshot to a
//!   [`ScheduleGrid`]. No I/O, no hidden state, no mutation of its inputs.
//! - **Task store**: in-memory owner of tasks; progress updates emit [`Event`]s
//! - **Rewards**: points and encouragement derived from progress events
//! - **Storage**: TOML configuration and JSON task snapshots
//!
//! ## Key Components
//!
//! - [`Scheduler`]: Slot allocation engine
//! - [`TaskStore`]: Task records and progress updates
//! - [`RewardTracker`]: Gamified feedback
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod reward;
pub mod schedule;
pub mod scheduler;
pub mod storage;
pub mod task;

pub use error::{ConfigError, CoreError, SchedulerError, ValidationError};
pub use events::Event;
pub use reward::{Reward, RewardKind, RewardTracker};
pub use schedule::{ClockTime, CommitmentWhen, DailyWindow, FixedCommitment, Settings, WeekStart};
pub use scheduler::{
    build_grid, shortfalls, Day, RemainingWork, ScheduleGrid, Scheduler, SchedulerConfig,
    Shortfall, Slot,
};
pub use storage::{Config, EngineVariant};
pub use task::{Priority, Task, TaskDraft, TaskStore, TaskType};
