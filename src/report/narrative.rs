//! Narrative log persistence.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{NarrativeLog, ReportRange};

/// File name of the narrative log for `range`.
pub fn narrative_log_name(range: &ReportRange) -> String {
    format!("{}.txt", range.file_stem())
}

/// Writes the run's narrative to `{dir}/{start}_to_{end}.txt`.
///
/// The directory is created if missing. Nothing is written for an empty
/// log, in which case `Ok(None)` is returned.
///
/// # Example
///
/// ```
/// use overtime_engine::models::{NarrativeLog, ReportRange};
/// use overtime_engine::report::persist_narrative_log;
/// use chrono::NaiveDate;
///
/// let dir = std::env::temp_dir().join("overtime-doc-narrative");
/// let range = ReportRange::weekly_ending_before(NaiveDate::from_ymd_opt(2026, 1, 19).unwrap());
/// let mut log = NarrativeLog::new();
/// log.push("Number of employees retrieved: 0");
///
/// let path = persist_narrative_log(&dir, &range, &log).unwrap().unwrap();
/// assert!(path.ends_with("2026-01-12_to_2026-01-18.txt"));
/// ```
pub fn persist_narrative_log(
    dir: &Path,
    range: &ReportRange,
    log: &NarrativeLog,
) -> EngineResult<Option<PathBuf>> {
    if log.is_empty() {
        return Ok(None);
    }

    fs::create_dir_all(dir).map_err(|e| EngineError::io(dir, e))?;

    let path = dir.join(narrative_log_name(range));
    fs::write(&path, log.lines().join("\n")).map_err(|e| EngineError::io(&path, e))?;

    debug!(path = %path.display(), lines = log.len(), "Persisted narrative log");
    Ok(Some(path))
}
