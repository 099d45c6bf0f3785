//! Configuration types for the overtime service.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from the YAML configuration file.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::PathBuf;

use crate::error::EngineResult;
use crate::models::DEFAULT_EXTRA_HOURS_MARKER;

use super::cron_schedule::{CronSchedule, DEFAULT_CRON};

fn default_timeout_secs() -> u64 {
    5
}

fn default_marker() -> String {
    DEFAULT_EXTRA_HOURS_MARKER.to_string()
}

fn default_cron() -> String {
    DEFAULT_CRON.to_string()
}

fn default_port() -> u16 {
    3000
}

/// Connection settings for the access-control device.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceConfig {
    /// Base URL of the device API (e.g., "http://192.168.0.10").
    pub endpoint: String,
    /// Login name used to open a session.
    pub username: String,
    /// Password used to open a session.
    pub password: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Hours added to the device's epoch timestamps to obtain wall-clock time.
    ///
    /// Devices that store local wall-clock time as if it were UTC need 0.
    /// Devices that store true UTC need the site's UTC offset, e.g. -3.
    #[serde(default)]
    pub clock_offset_hours: i64,
}

/// Payroll settings used when pricing overtime.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollConfig {
    /// Amount paid per hour of overtime.
    pub hourly_rate: Decimal,
    /// Substring that flags a window group as extra hours.
    #[serde(default = "default_marker")]
    pub extra_hours_marker: String,
}

/// Where run artifacts are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root output directory.
    pub directory: PathBuf,
}

impl OutputConfig {
    /// Directory holding one report folder per run.
    pub fn reports_dir(&self) -> PathBuf {
        self.directory.join("reports")
    }

    /// Directory holding the narrative logs.
    pub fn logs_dir(&self) -> PathBuf {
        self.directory.join("logs")
    }
}

/// Run trigger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    /// Cron expression for the weekly report, evaluated in local time.
    #[serde(default = "default_cron")]
    pub cron: String,
}

impl ScheduleConfig {
    /// Parses the configured expression.
    pub fn trigger(&self) -> EngineResult<CronSchedule> {
        CronSchedule::parse(&self.cron)
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: default_cron(),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the browsing API listens on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// What a batch run does when one employee fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// The first failure aborts the whole run.
    #[default]
    AbortRun,
    /// The failing employee is recorded and the run continues.
    SkipEmployee,
}

/// The complete service configuration loaded from YAML.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Device connection settings.
    pub device: DeviceConfig,
    /// Payroll settings.
    pub payroll: PayrollConfig,
    /// Output locations.
    pub output: OutputConfig,
    /// Run trigger.
    #[serde(default)]
    pub schedule: ScheduleConfig,
    /// HTTP server.
    #[serde(default)]
    pub server: ServerConfig,
    /// Per-employee failure handling.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}
