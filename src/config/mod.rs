//! Configuration loading and management for the Overtime Engine.
//!
//! This module loads the service configuration from a YAML file: device
//! connection, payroll rate, output locations, cron trigger, HTTP port and
//! failure policy.
//!
//! # Example
//!
//! ```no_run
//! use overtime_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/overtime.yaml").unwrap();
//! println!("Reports go to {}", config.config().output.reports_dir().display());
//! ```

mod cron_schedule;
mod loader;
mod types;

pub use cron_schedule::{CronSchedule, DEFAULT_CRON};
pub use loader::ConfigLoader;
pub use types::{
    AppConfig, DeviceConfig, FailurePolicy, OutputConfig, PayrollConfig, ScheduleConfig,
    ServerConfig,
};
