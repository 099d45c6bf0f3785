//! Cron trigger for the weekly run.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone};
use tracing::{info, warn};

use crate::config::CronSchedule;

use super::OvertimeService;

/// The first fire time of `schedule` strictly after `now`.
///
/// # Example
///
/// ```
/// use overtime_engine::config::CronSchedule;
/// use overtime_engine::service::next_run_after;
/// use chrono::{TimeZone, Utc};
///
/// let schedule = CronSchedule::parse("0 10 0 * * *").unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 1, 19, 8, 0, 0).unwrap();
/// let next = next_run_after(&now, &schedule).unwrap();
/// assert_eq!(next.to_string(), "2026-01-20 00:10:00 UTC");
/// ```
pub fn next_run_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    schedule: &CronSchedule,
) -> Option<DateTime<Tz>> {
    schedule.next_after(now)
}

/// Runs the service at every fire time of `schedule`, in local time.
///
/// Each run completes before the next one is scheduled. Failures are logged
/// and do not stop the loop. Returns only if the schedule has no further
/// fire times.
pub async fn run_scheduled(service: Arc<OvertimeService>, schedule: CronSchedule) {
    loop {
        let now = Local::now();
        let Some(next) = next_run_after(&now, &schedule) else {
            warn!(cron = %schedule, "Schedule has no upcoming runs");
            return;
        };
        let wait = (next - now).to_std().unwrap_or_default();
        info!(
            cron = %schedule,
            next_run = %next,
            wait_secs = wait.as_secs(),
            "Scheduled next overtime run"
        );

        tokio::time::sleep(wait).await;
        service.run_guarded(Local::now().date_naive()).await;
    }
}
