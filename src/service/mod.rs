//! Run orchestration: one weekly batch from provider to report files.
//!
//! A run computes the trailing seven-day range, opens a provider session,
//! reconciles every employee, releases the session, persists the narrative
//! log and emits one report per employee in name order.

mod batch;
mod scheduler;

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::{AppConfig, FailurePolicy};
use crate::error::EngineResult;
use crate::models::ReportRange;
use crate::provider::AccessProvider;
use crate::report::{PdfReportEmitter, ReportEmitter, persist_narrative_log};

pub use batch::{BatchOutcome, BatchSettings, EmployeeFailure, run_batch};
pub use scheduler::{next_run_after, run_scheduled};

/// What a completed run produced.
#[derive(Debug)]
pub struct RunSummary {
    /// Identifier used to correlate this run's log records.
    pub run_id: Uuid,
    /// The range covered.
    pub range: ReportRange,
    /// Report files, in employee name order.
    pub reports: Vec<PathBuf>,
    /// The persisted narrative log, if anything was recorded.
    pub narrative_log: Option<PathBuf>,
    /// Employees skipped because of a failure, including reports that could
    /// not be written.
    pub failures: Vec<EmployeeFailure>,
    /// Number of employees retrieved.
    pub employees: usize,
    /// Number of access events reconciled.
    pub total_events: usize,
}

/// Drives weekly overtime runs.
pub struct OvertimeService {
    provider: Arc<dyn AccessProvider>,
    emitter: Arc<dyn ReportEmitter>,
    logs_dir: PathBuf,
    marker: String,
    failure_policy: FailurePolicy,
}

impl OvertimeService {
    /// Creates a service from its collaborators.
    pub fn new(
        provider: Arc<dyn AccessProvider>,
        emitter: Arc<dyn ReportEmitter>,
        logs_dir: impl Into<PathBuf>,
        marker: impl Into<String>,
        failure_policy: FailurePolicy,
    ) -> Self {
        Self {
            provider,
            emitter,
            logs_dir: logs_dir.into(),
            marker: marker.into(),
            failure_policy,
        }
    }

    /// Creates a service writing PDF reports as configured.
    pub fn from_config(config: &AppConfig, provider: Arc<dyn AccessProvider>) -> Self {
        let emitter = PdfReportEmitter::new(config.output.reports_dir(), config.payroll.hourly_rate);
        Self::new(
            provider,
            Arc::new(emitter),
            config.output.logs_dir(),
            config.payroll.extra_hours_marker.clone(),
            config.failure_policy,
        )
    }

    /// Runs the weekly report for a run executing on `today`.
    pub async fn run_once(&self, today: NaiveDate) -> EngineResult<RunSummary> {
        self.run_range(ReportRange::weekly_ending_before(today)).await
    }

    /// Runs the report for an explicit range.
    ///
    /// The provider session is released before any file is written, whether
    /// the batch succeeded or not. A failed batch writes nothing. A report that
    /// cannot be written fails the run under [`FailurePolicy::AbortRun`] and is
    /// recorded as a failure under [`FailurePolicy::SkipEmployee`].
    pub async fn run_range(&self, range: ReportRange) -> EngineResult<RunSummary> {
        let run_id = Uuid::new_v4();
        info!(run_id = %run_id, range = %range, "Starting overtime run");

        let mut session = self.provider.acquire().await?;
        let settings = BatchSettings {
            marker: &self.marker,
            failure_policy: self.failure_policy,
        };
        let outcome = run_batch(session.as_mut(), range, settings).await;

        if let Err(e) = session.release().await {
            warn!(run_id = %run_id, error = %e, "Failed to release provider session");
        }

        let mut outcome = outcome?;
        let narrative_log = persist_narrative_log(&self.logs_dir, &range, &outcome.narrative)?;

        let mut reports = Vec::with_capacity(outcome.results.len());
        for result in &outcome.results {
            match self.emitter.emit(&range, result, narrative_log.as_deref()) {
                Ok(path) => reports.push(path),
                Err(error) => match self.failure_policy {
                    FailurePolicy::AbortRun => return Err(error),
                    FailurePolicy::SkipEmployee => {
                        warn!(
                            run_id = %run_id,
                            employee_id = result.employee.id,
                            error = %error,
                            "Report not written, employee skipped"
                        );
                        outcome.failures.push(EmployeeFailure {
                            employee: result.employee.clone(),
                            error,
                        });
                    }
                },
            }
        }

        info!(
            run_id = %run_id,
            employees = outcome.employees,
            reports = reports.len(),
            failures = outcome.failures.len(),
            total_events = outcome.total_events,
            "Overtime run completed"
        );

        Ok(RunSummary {
            run_id,
            range,
            reports,
            narrative_log,
            failures: outcome.failures,
            employees: outcome.employees,
            total_events: outcome.total_events,
        })
    }

    /// Runs [`Self::run_once`], logging and swallowing any failure.
    pub async fn run_guarded(&self, today: NaiveDate) -> Option<RunSummary> {
        match self.run_once(today).await {
            Ok(summary) => Some(summary),
            Err(e) => {
                error!(error = %e, "Overtime run failed");
                None
            }
        }
    }
}
