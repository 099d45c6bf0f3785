//! Cron expressions for the run trigger.
//!
//! Expressions use the `cron` crate's six-field form
//! (`sec min hour day-of-month month day-of-week`, optional year). The
//! classic five-field crontab form is accepted too: it gets a zero seconds
//! field, and its numeric days of week (0 or 7 = Sunday) are rewritten as
//! day names.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone};
use cron::Schedule;

use crate::error::{EngineError, EngineResult};

/// Every day at 00:10:00.
pub const DEFAULT_CRON: &str = "0 10 0 * * *";

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A parsed trigger schedule.
///
/// # Example
///
/// ```
/// use overtime_engine::config::CronSchedule;
/// use chrono::{TimeZone, Utc};
///
/// // Mondays at 00:10, crontab style
/// let schedule = CronSchedule::parse("10 0 * * 1").unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 1, 13, 8, 0, 0).unwrap();
/// let next = schedule.next_after(&now).unwrap();
/// assert_eq!(next, Utc.with_ymd_and_hms(2026, 1, 19, 0, 10, 0).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct CronSchedule {
    expression: String,
    schedule: Schedule,
}

impl CronSchedule {
    /// Parses a five- or six-field cron expression.
    ///
    /// # Errors
    ///
    /// Returns `InvalidData` when the expression does not parse.
    pub fn parse(expression: &str) -> EngineResult<Self> {
        let normalized = normalize(expression);
        let schedule = Schedule::from_str(&normalized).map_err(|e| EngineError::InvalidData {
            message: format!("invalid cron expression '{}': {}", expression, e),
        })?;

        Ok(Self {
            expression: expression.trim().to_string(),
            schedule,
        })
    }

    /// The expression as configured.
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// The first fire time strictly after `now`, if the schedule has one.
    pub fn next_after<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
        self.schedule.after(now).next()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression)
    }
}

fn normalize(expression: &str) -> String {
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != 5 {
        return fields.join(" ");
    }

    format!(
        "0 {} {} {} {} {}",
        fields[0],
        fields[1],
        fields[2],
        fields[3],
        crontab_days_of_week(fields[4])
    )
}

/// Rewrites crontab day-of-week numbers as names, expanding numeric ranges.
fn crontab_days_of_week(field: &str) -> String {
    field
        .split(',')
        .map(crontab_day_item)
        .collect::<Vec<_>>()
        .join(",")
}

fn crontab_day_item(item: &str) -> String {
    let (range, step) = match item.split_once('/') {
        Some((range, step)) => (range, step.parse::<usize>().ok()),
        None => (item, Some(1)),
    };

    let bounds = match range.split_once('-') {
        Some((from, to)) => from.parse::<usize>().ok().zip(to.parse::<usize>().ok()),
        None if step == Some(1) => range.parse::<usize>().ok().map(|day| (day, day)),
        None => None,
    };

    match (bounds, step) {
        (Some((from, to)), Some(step)) if from <= to && to <= 7 && step > 0 => (from..=to)
            .step_by(step)
            .map(|day| DAY_NAMES[day % 7])
            .collect::<Vec<_>>()
            .join(","),
        _ => item.to_string(),
    }
}
