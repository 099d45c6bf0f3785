//! Report range model.
//!
//! This module contains the [`ReportRange`] type that bounds a batch run.

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Milliseconds from midnight to 23:59:59.999.
const END_OF_DAY_MILLIS: i64 = 86_399_999;

/// The inclusive date-time range covered by a batch run.
///
/// # Example
///
/// ```
/// use overtime_engine::models::ReportRange;
/// use chrono::NaiveDate;
///
/// // Run executes on Monday 2026-01-19
/// let range = ReportRange::weekly_ending_before(NaiveDate::from_ymd_opt(2026, 1, 19).unwrap());
///
/// assert_eq!(range.start.to_string(), "2026-01-12 00:00:00");
/// assert_eq!(range.end.to_string(), "2026-01-18 23:59:59.999");
/// assert_eq!(range.file_stem(), "2026-01-12_to_2026-01-18");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRange {
    /// First instant of the range (inclusive).
    pub start: NaiveDateTime,
    /// Last instant of the range (inclusive).
    pub end: NaiveDateTime,
}

impl ReportRange {
    /// Creates a range, rejecting one whose end precedes its start.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> EngineResult<Self> {
        if end < start {
            return Err(EngineError::InvalidData {
                message: format!("range end {} precedes start {}", end, start),
            });
        }
        Ok(Self { start, end })
    }

    /// The trailing seven-day range for a run executing on `today`.
    ///
    /// End is yesterday at 23:59:59.999; start is six days before that at 00:00:00.000.
    pub fn weekly_ending_before(today: NaiveDate) -> Self {
        let end_date = today - Days::new(1);
        let start_date = end_date - Days::new(6);

        Self {
            start: start_date.and_time(NaiveTime::MIN),
            end: end_date.and_time(NaiveTime::MIN) + TimeDelta::milliseconds(END_OF_DAY_MILLIS),
        }
    }

    /// Returns true if `timestamp` falls within the range (inclusive).
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }

    /// Deterministic name for artifacts of this range: `{start}_to_{end}` as `YYYY-MM-DD`.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_to_{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

impl std::fmt::Display for ReportRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%d/%m/%Y"),
            self.end.format("%d/%m/%Y")
        )
    }
}
