//! Periodic e-paper refresh: capture a page, transcode it for the panel,
//! show it, and do it again every interval.

pub mod config;
pub mod cycle;
pub mod error;
pub mod scheduler;

pub use config::{Config, DriverKind, config_path};
pub use cycle::{CycleOutcome, CycleResult, CycleSettings, UpdateCycle};
pub use error::{ConfigError, CycleError, Stage};
pub use scheduler::{Cycle, ScheduleState, Scheduler};
