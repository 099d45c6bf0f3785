//! Batch reconciliation over a provider session.
//!
//! Employees are processed sequentially in provider order. Windows are only
//! fetched for employees that have access events in the range.

use tracing::{info, warn};

use crate::calculation::{reconcile_employee, sort_by_name};
use crate::config::FailurePolicy;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeOvertimeResult, NarrativeLog, ReportRange};
use crate::provider::ProviderSession;

/// An employee whose processing failed under [`FailurePolicy::SkipEmployee`].
#[derive(Debug)]
pub struct EmployeeFailure {
    /// The employee that was skipped.
    pub employee: Employee,
    /// Why processing failed.
    pub error: EngineError,
}

/// The outcome of one batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    /// The reporting range.
    pub range: ReportRange,
    /// Employees with at least one span, sorted by display name.
    pub results: Vec<EmployeeOvertimeResult>,
    /// Employees skipped because of a failure.
    pub failures: Vec<EmployeeFailure>,
    /// The run-wide narrative.
    pub narrative: NarrativeLog,
    /// Number of employees retrieved from the provider.
    pub employees: usize,
    /// Number of access events reconciled across all employees.
    pub total_events: usize,
}

/// Settings for a batch run.
#[derive(Debug, Clone, Copy)]
pub struct BatchSettings<'a> {
    /// Group-name marker selecting extra-hours windows.
    pub marker: &'a str,
    /// What to do when one employee fails.
    pub failure_policy: FailurePolicy,
}

/// Processes one employee, returning its result (if any) and the number of
/// access events reconciled.
async fn process_employee(
    session: &mut dyn ProviderSession,
    employee: &Employee,
    range: &ReportRange,
    marker: &str,
    log: &mut NarrativeLog,
) -> EngineResult<(Option<EmployeeOvertimeResult>, usize)> {
    let events = session.list_access_events(employee.id, range).await?;
    if events.is_empty() {
        let line = format!(
            "Employee {} - {} has no accesses in the requested period!",
            employee.id, employee.name
        );
        warn!(employee_id = employee.id, "{}", line);
        log.push(line);
        return Ok((None, 0));
    }

    let windows = session.list_schedule_windows(employee.id).await?;
    if windows.is_empty() {
        let line = format!(
            "Employee {} - {} has no schedule windows!",
            employee.id, employee.name
        );
        warn!(employee_id = employee.id, "{}", line);
        log.push(line);
        return Ok((None, 0));
    }

    let accesses = events.iter().filter(|e| e.is_access()).count();
    let result = reconcile_employee(employee, &events, &windows, marker, log)?;
    Ok((result, accesses))
}

/// Runs a reconciliation batch over `session`.
///
/// The session is not released here; the caller owns its lifetime.
///
/// # Errors
///
/// Fails if the employee list cannot be retrieved, or on the first
/// per-employee failure when the policy is [`FailurePolicy::AbortRun`].
pub async fn run_batch(
    session: &mut dyn ProviderSession,
    range: ReportRange,
    settings: BatchSettings<'_>,
) -> EngineResult<BatchOutcome> {
    let mut narrative = NarrativeLog::new();

    let start_line = format!("Starting processing for the period {}!", range);
    info!("{}", start_line);
    narrative.push(start_line);

    let employees = session.list_employees().await?;
    let count_line = format!("Number of employees retrieved: {}", employees.len());
    info!(employees = employees.len(), "{}", count_line);
    narrative.push(count_line);

    let mut results = Vec::new();
    let mut failures = Vec::new();
    let mut total_events = 0;

    for employee in &employees {
        let mut log = NarrativeLog::new();
        let outcome =
            process_employee(session, employee, &range, settings.marker, &mut log).await;
        narrative.extend(log.lines().iter().cloned());

        match outcome {
            Ok((result, accesses)) => {
                total_events += accesses;
                results.extend(result);
            }
            Err(error) => match settings.failure_policy {
                FailurePolicy::AbortRun => return Err(error),
                FailurePolicy::SkipEmployee => {
                    let line = format!(
                        "Employee {} - {} was skipped: {}",
                        employee.id, employee.name, error
                    );
                    warn!(employee_id = employee.id, error = %error, "Skipping employee");
                    narrative.push(line);
                    failures.push(EmployeeFailure {
                        employee: employee.clone(),
                        error,
                    });
                }
            },
        }
    }

    let total_line = format!("Number of accesses retrieved: {}", total_events);
    info!(total_events, "{}", total_line);
    narrative.push(total_line);

    sort_by_name(&mut results);

    Ok(BatchOutcome {
        range,
        results,
        failures,
        narrative,
        employees: employees.len(),
        total_events,
    })
}
