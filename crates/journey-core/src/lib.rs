//! # Journey Core Library
//!
//! Core logic for a single-user learning-streak tracker. A learner declares
//! one goal (a topic over a weekly, monthly, or yearly period) and marks
//! each calendar day as learned, frozen (an excused skip), or unlogged.
//! The `journey` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Calendar**: timezone-free day keys and the week-start convention
//! - **Progress / Goal**: fail-soft persistence over a key-value slot store
//! - **Period / Freeze / Transition**: pure rules for period bounds, the
//!   weekly freeze quota, and re-focusing after a goal revision
//! - **Activity**: the engine that ties the above to a browsed view
//! - **Storage**: SQLite `kv` table and TOML configuration
//!
//! ## Key Components
//!
//! - [`ActivityEngine`]: mutation and query API
//! - [`Database`]: durable slot store
//! - [`Config`]: application configuration

pub mod activity;
pub mod calendar;
pub mod error;
pub mod events;
pub mod freeze;
pub mod goal;
pub mod history;
pub mod period;
pub mod progress;
pub mod storage;
pub mod transition;

pub use activity::{
    ActivityEngine, ActivitySnapshot, Clock, EngineSettings, FixedClock, SystemClock, ViewState,
    WeekDay,
};
pub use calendar::{DateKey, WeekStart};
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use events::Event;
pub use freeze::{FreezeQuota, WeekCounts, MAX_FREEZES_PER_WEEK};
pub use goal::{Goal, GoalRevision, Timeframe, DEFAULT_TOPIC};
pub use history::{HistoryCell, MonthSection};
pub use period::Period;
pub use progress::{DayStatus, ProgressMap};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
