//! Application state for the report browsing API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::OutputConfig;

#[derive(Debug)]
struct Directories {
    reports: PathBuf,
    logs: PathBuf,
}

/// Shared application state.
///
/// Holds the directories the handlers serve files from.
#[derive(Debug, Clone)]
pub struct AppState {
    dirs: Arc<Directories>,
}

impl AppState {
    /// Creates state serving the given report and log directories.
    pub fn new(reports: impl Into<PathBuf>, logs: impl Into<PathBuf>) -> Self {
        Self {
            dirs: Arc::new(Directories {
                reports: reports.into(),
                logs: logs.into(),
            }),
        }
    }

    /// Creates state from the output configuration.
    pub fn from_output(output: &OutputConfig) -> Self {
        Self::new(output.reports_dir(), output.logs_dir())
    }

    /// Directory holding one folder of PDFs per run.
    pub fn reports_dir(&self) -> &Path {
        &self.dirs.reports
    }

    /// Directory holding the narrative logs.
    pub fn logs_dir(&self) -> &Path {
        &self.dirs.logs
    }
}
