//! Error types for the Overtime Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while fetching, reconciling and
//! reporting overtime.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the Overtime Engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use overtime_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/overtime.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/overtime.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The access-control device rejected or failed an operation.
    #[error("Device operation '{operation}' failed: {message}")]
    Device {
        /// The device operation that failed (e.g. "login", "load_objects:users").
        operation: String,
        /// A description of the failure.
        message: String,
    },

    /// The HTTP transport to the device failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A filesystem operation failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// The path being read or written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Provider data was inconsistent or malformed.
    #[error("Invalid data: {message}")]
    InvalidData {
        /// A description of the inconsistency.
        message: String,
    },

    /// A worked span would have a negative duration.
    ///
    /// This can only happen when the event sequence is not chronological.
    #[error("Negative duration between entry {entry} and exit {exit}")]
    NegativeDuration {
        /// The entry timestamp of the offending span.
        entry: NaiveDateTime,
        /// The exit timestamp of the offending span.
        exit: NaiveDateTime,
    },

    /// A report could not be rendered.
    #[error("Report error: {message}")]
    Report {
        /// A description of the rendering failure.
        message: String,
    },
}

impl EngineError {
    /// Builds an [`EngineError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/overtime.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/overtime.yaml"
        );
    }

    #[test]
    fn test_config_parse_error_displays_path_and_message() {
        let error = EngineError::ConfigParseError {
            path: "/config/bad.yaml".to_string(),
            message: "invalid YAML syntax".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to parse configuration file '/config/bad.yaml': invalid YAML syntax"
        );
    }

    #[test]
    fn test_device_error_displays_operation_and_message() {
        let error = EngineError::Device {
            operation: "login".to_string(),
            message: "invalid credentials".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Device operation 'login' failed: invalid credentials"
        );
    }

    #[test]
    fn test_io_error_displays_path() {
        let error = EngineError::io(
            "/tmp/logs/a.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(error.to_string(), "I/O error on '/tmp/logs/a.txt': denied");
    }

    #[test]
    fn test_negative_duration_displays_timestamps() {
        let entry = NaiveDateTime::parse_from_str("2026-01-12 10:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let exit = NaiveDateTime::parse_from_str("2026-01-12 09:00:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        let error = EngineError::NegativeDuration { entry, exit };
        assert_eq!(
            error.to_string(),
            "Negative duration between entry 2026-01-12 10:00:00 and exit 2026-01-12 09:00:00"
        );
    }

    #[test]
    fn test_invalid_data_displays_message() {
        let error = EngineError::InvalidData {
            message: "window offset out of range".to_string(),
        };
        assert_eq!(error.to_string(), "Invalid data: window offset out of range");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_config_not_found() -> EngineResult<()> {
            Err(EngineError::ConfigNotFound {
                path: "/test".to_string(),
            })
        }

        fn propagates_error() -> EngineResult<()> {
            returns_config_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
