//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the service
//! configuration from a YAML file.

use rust_decimal::Decimal;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::AppConfig;

/// Loads and validates the service configuration.
///
/// # Example
///
/// ```no_run
/// use overtime_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/overtime.yaml")?;
/// println!("Device: {}", loader.config().device.endpoint);
/// # Ok::<(), overtime_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AppConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML or a required field is missing
    /// - A value fails validation (empty endpoint, negative rate, empty marker)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<AppConfig>(path)?;
        Self::validate(&config, path)?;
        Ok(Self { config })
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml(content: &str) -> EngineResult<Self> {
        let path = Path::new("<inline>");
        let config: AppConfig =
            serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Self::validate(&config, path)?;
        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn validate(config: &AppConfig, path: &Path) -> EngineResult<()> {
        let invalid = |message: &str| EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: message.to_string(),
        };

        if config.device.endpoint.trim().is_empty() {
            return Err(invalid("device.endpoint must not be empty"));
        }
        if config.device.timeout_secs == 0 {
            return Err(invalid("device.timeout_secs must be positive"));
        }
        if config.payroll.hourly_rate < Decimal::ZERO {
            return Err(invalid("payroll.hourly_rate must not be negative"));
        }
        if config.payroll.extra_hours_marker.is_empty() {
            return Err(invalid("payroll.extra_hours_marker must not be empty"));
        }
        if let Err(e) = config.schedule.trigger() {
            return Err(invalid(&format!("schedule.cron: {}", e)));
        }

        Ok(())
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> AppConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_CRON, FailurePolicy};
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/overtime.yaml"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    const MINIMAL: &str = r#"
device:
  endpoint: "http://127.0.0.1:8080"
  username: admin
  password: admin
payroll:
  hourly_rate: "15.00"
output:
  directory: ./out
"#;

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.payroll.hourly_rate, dec("15.00"));
        assert_eq!(config.payroll.extra_hours_marker, "[EXTRA]");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.device.clock_offset_hours, 0);
        assert_eq!(config.schedule.cron, DEFAULT_CRON);
    }

    #[test]
    fn test_defaults_applied() {
        let config = ConfigLoader::from_yaml(MINIMAL).unwrap().into_config();

        assert_eq!(config.device.timeout_secs, 5);
        assert_eq!(config.device.clock_offset_hours, 0);
        assert_eq!(config.payroll.extra_hours_marker, "[EXTRA]");
        assert_eq!(config.schedule.cron, DEFAULT_CRON);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.failure_policy, FailurePolicy::AbortRun);
    }

    #[test]
    fn test_output_subdirectories() {
        let config = ConfigLoader::from_yaml(MINIMAL).unwrap().into_config();
        assert!(config.output.reports_dir().ends_with("out/reports"));
        assert!(config.output.logs_dir().ends_with("out/logs"));
    }

    #[test]
    fn test_failure_policy_parsed() {
        let yaml = format!("{}failure_policy: skip_employee\n", MINIMAL);
        let config = ConfigLoader::from_yaml(&yaml).unwrap().into_config();
        assert_eq!(config.failure_policy, FailurePolicy::SkipEmployee);
    }

    #[test]
    fn test_schedule_cron_parsed() {
        let yaml = format!("{}schedule:\n  cron: \"10 0 * * 1\"\n", MINIMAL);
        let config = ConfigLoader::from_yaml(&yaml).unwrap().into_config();
        assert_eq!(config.schedule.cron, "10 0 * * 1");
        assert_eq!(config.schedule.trigger().unwrap().expression(), "10 0 * * 1");
    }

    #[test]
    fn test_invalid_cron_rejected() {
        let yaml = format!("{}schedule:\n  cron: \"every monday\"\n", MINIMAL);
        match ConfigLoader::from_yaml(&yaml) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("schedule.cron"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_rejected() {
        let yaml = MINIMAL.replace("\"15.00\"", "\"-1\"");
        match ConfigLoader::from_yaml(&yaml) {
            Err(EngineError::ConfigParseError { message, .. }) => {
                assert!(message.contains("hourly_rate"));
            }
            other => panic!("Expected ConfigParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_section_rejected() {
        let result = ConfigLoader::from_yaml("payroll:\n  hourly_rate: \"1\"\n");
        assert!(matches!(result, Err(EngineError::ConfigParseError { .. })));
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/overtime.yaml");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("overtime.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
