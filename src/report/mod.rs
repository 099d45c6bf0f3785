//! Run artifacts: the narrative log and per-employee reports.

mod narrative;
mod pdf;

use std::path::{Path, PathBuf};

use crate::error::EngineResult;
use crate::models::{EmployeeOvertimeResult, ReportRange};

pub use narrative::{narrative_log_name, persist_narrative_log};
pub use pdf::PdfReportEmitter;

/// Renders one employee's overtime report.
pub trait ReportEmitter: Send + Sync {
    /// Writes the report and returns where it was written.
    ///
    /// `narrative_log` is the persisted narrative for the run, referenced from
    /// the report when present.
    fn emit(
        &self,
        range: &ReportRange,
        result: &EmployeeOvertimeResult,
        narrative_log: Option<&Path>,
    ) -> EngineResult<PathBuf>;
}
