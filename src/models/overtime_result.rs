//! Reconciliation result models.
//!
//! This module contains the [`WorkedSpan`], [`EmployeeOvertimeResult`] and
//! [`NarrativeLog`] types that capture the outputs of a batch run.

use serde::{Deserialize, Serialize};

use super::{AccessEvent, Employee};
use crate::error::{EngineError, EngineResult};

/// A reconciled entry/exit pair, the atomic unit of overtime.
///
/// # Example
///
/// ```
/// use overtime_engine::models::{AccessEvent, Direction, WorkedSpan};
/// use chrono::NaiveDateTime;
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let span = WorkedSpan::between(
///     AccessEvent::new(at("2026-01-12 09:30:00"), Direction::Entry),
///     AccessEvent::new(at("2026-01-12 10:15:00"), Direction::Exit),
/// )
/// .unwrap();
/// assert_eq!(span.duration_secs, 2700);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkedSpan {
    /// The entry event (real or synthetic).
    pub entry: AccessEvent,
    /// The exit event (real or synthetic).
    pub exit: AccessEvent,
    /// Whole seconds between entry and exit.
    pub duration_secs: u64,
}

impl WorkedSpan {
    /// Builds a span, rejecting an exit that precedes its entry.
    pub fn between(entry: AccessEvent, exit: AccessEvent) -> EngineResult<Self> {
        let seconds = (exit.timestamp - entry.timestamp).num_seconds();
        if seconds < 0 {
            return Err(EngineError::NegativeDuration {
                entry: entry.timestamp,
                exit: exit.timestamp,
            });
        }

        Ok(Self {
            entry,
            exit,
            duration_secs: seconds as u64,
        })
    }
}

/// All worked spans reconciled for one employee in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeOvertimeResult {
    /// The employee the spans belong to.
    pub employee: Employee,
    /// Spans in chronological order.
    pub spans: Vec<WorkedSpan>,
}

impl EmployeeOvertimeResult {
    /// Total worked seconds across all spans.
    pub fn total_seconds(&self) -> u64 {
        self.spans.iter().map(|s| s.duration_secs).sum()
    }
}

/// Ordered, human-readable trace of every decision made during a run.
///
/// This is the audit artifact persisted next to the reports.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeLog {
    lines: Vec<String>,
}

impl NarrativeLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Returns the lines in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines recorded.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl Extend<String> for NarrativeLog {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.lines.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Direction;
    use chrono::NaiveDateTime;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn span(entry: &str, exit: &str) -> WorkedSpan {
        WorkedSpan::between(
            AccessEvent::new(make_datetime(entry), Direction::Entry),
            AccessEvent::new(make_datetime(exit), Direction::Exit),
        )
        .unwrap()
    }

    #[test]
    fn test_zero_length_span_is_allowed() {
        let span = span("2026-01-12 09:00:00", "2026-01-12 09:00:00");
        assert_eq!(span.duration_secs, 0);
    }

    #[test]
    fn test_exit_before_entry_is_rejected() {
        let result = WorkedSpan::between(
            AccessEvent::new(make_datetime("2026-01-12 10:00:00"), Direction::Entry),
            AccessEvent::new(make_datetime("2026-01-12 09:59:59"), Direction::Exit),
        );

        match result {
            Err(EngineError::NegativeDuration { entry, exit }) => {
                assert_eq!(entry, make_datetime("2026-01-12 10:00:00"));
                assert_eq!(exit, make_datetime("2026-01-12 09:59:59"));
            }
            other => panic!("Expected NegativeDuration, got {:?}", other),
        }
    }

    #[test]
    fn test_total_seconds_sums_spans() {
        let result = EmployeeOvertimeResult {
            employee: Employee {
                id: 1,
                registration: "1".to_string(),
                name: "Ana".to_string(),
            },
            spans: vec![
                span("2026-01-12 09:30:00", "2026-01-12 10:15:00"),
                span("2026-01-13 22:00:00", "2026-01-13 23:00:00"),
            ],
        };

        assert_eq!(result.total_seconds(), 2700 + 3600);
    }

    #[test]
    fn test_narrative_log_preserves_order() {
        let mut log = NarrativeLog::new();
        assert!(log.is_empty());

        log.push("first");
        log.extend(vec!["second".to_string(), "third".to_string()]);

        assert_eq!(log.len(), 3);
        assert_eq!(log.lines(), ["first", "second", "third"]);
    }
}
