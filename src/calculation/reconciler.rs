//! Per-employee overtime reconciliation.
//!
//! This module drives the window matcher and the event pairer over one
//! employee's access events, accumulating worked spans and narrative lines,
//! and orders the final results for reporting.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::error::EngineResult;
use crate::models::{AccessEvent, Employee, EmployeeOvertimeResult, NarrativeLog, ScheduleWindow};

use super::event_pairer::{format_timestamp, pair_at};
use super::pay::format_duration;
use super::window_matcher::find_active_window;

/// Reconciles one employee's access events against their schedule windows.
///
/// Only type-7 access events take part, and only windows whose group name
/// contains `marker` are eligible. Every decision is appended to `log`.
///
/// # Returns
///
/// `Ok(None)` when no span was produced (the employee is dropped from the
/// run's results), otherwise the employee's spans in chronological order.
///
/// # Errors
///
/// Propagates pairing errors; a negative span duration means the events were
/// not in chronological order.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::reconcile_employee;
/// use overtime_engine::models::{
///     AccessEvent, Direction, Employee, HolidayFlags, NarrativeLog, ScheduleWindow,
///     WeekdayFlags, WindowGroup,
/// };
/// use chrono::{NaiveDateTime, Weekday};
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let employee = Employee { id: 1, registration: "001".to_string(), name: "Ana".to_string() };
/// let windows = vec![ScheduleWindow {
///     id: 1,
///     group: WindowGroup { id: 1, name: "[EXTRA] Morning".to_string() },
///     start_offset: 9 * 3600,
///     end_offset: 11 * 3600,
///     weekdays: WeekdayFlags::only(&[Weekday::Mon]),
///     holidays: HolidayFlags::default(),
/// }];
/// let events = vec![
///     AccessEvent::new(at("2026-01-12 09:30:00"), Direction::Entry),
///     AccessEvent::new(at("2026-01-12 10:15:00"), Direction::Exit),
/// ];
/// let mut log = NarrativeLog::new();
///
/// let result = reconcile_employee(&employee, &events, &windows, "[EXTRA]", &mut log)
///     .unwrap()
///     .unwrap();
/// assert_eq!(result.total_seconds(), 2700);
/// ```
pub fn reconcile_employee(
    employee: &Employee,
    events: &[AccessEvent],
    windows: &[ScheduleWindow],
    marker: &str,
    log: &mut NarrativeLog,
) -> EngineResult<Option<EmployeeOvertimeResult>> {
    let accesses: Vec<AccessEvent> = events.iter().filter(|e| e.is_access()).cloned().collect();
    let eligible: Vec<ScheduleWindow> = windows
        .iter()
        .filter(|w| w.is_extra_hours(marker))
        .cloned()
        .collect();

    log.push(format!("========== {} ==========", employee.name));
    log.push(format!("Number of accesses: {}", accesses.len()));

    debug!(
        employee_id = employee.id,
        accesses = accesses.len(),
        eligible_windows = eligible.len(),
        "Reconciling employee"
    );

    let mut spans = Vec::new();
    let mut total_seconds: u64 = 0;
    let mut cursor = 0;

    while cursor < accesses.len() {
        let base = &accesses[cursor];

        match find_active_window(base.timestamp, &eligible) {
            Some(window) => {
                let step = pair_at(&accesses, cursor, window)?;
                log.extend(step.trace);
                if let Some(span) = step.span {
                    total_seconds += span.duration_secs;
                    spans.push(span);
                }
                cursor = step.next_cursor;
            }
            None => {
                log.push(format!(
                    "Access {} does not fall under any extra-hours rule!",
                    format_timestamp(base)
                ));
                cursor += 1;
            }
        }
    }

    let summary = format!(
        "Employee {} - {} worked a total of {}!",
        employee.id,
        employee.name,
        format_duration(total_seconds)
    );
    info!(employee_id = employee.id, total_seconds, "{}", summary);
    log.push(summary);

    if spans.is_empty() {
        return Ok(None);
    }

    Ok(Some(EmployeeOvertimeResult {
        employee: employee.clone(),
        spans,
    }))
}

/// Folds accents and case so names compare the way a reader expects.
fn collation_key(name: &str) -> String {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
            'ç' => 'c',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ñ' => 'n',
            'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            'ý' | 'ÿ' => 'y',
            other => other,
        })
        .collect()
}

/// Compares display names ignoring accents and case, falling back to the raw names.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}

/// Sorts results by employee display name.
pub fn sort_by_name(results: &mut [EmployeeOvertimeResult]) {
    results.sort_by(|a, b| {
        compare_names(&a.employee.name, &b.employee.name)
            .then_with(|| a.employee.id.cmp(&b.employee.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::models::{Direction, HolidayFlags, WeekdayFlags, WindowGroup};
    use chrono::{NaiveDateTime, Weekday};

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn employee(id: i64, name: &str) -> Employee {
        Employee {
            id,
            registration: format!("{:04}", id),
            name: name.to_string(),
        }
    }

    fn window(group: &str, start: u32, end: u32, days: &[Weekday]) -> ScheduleWindow {
        ScheduleWindow {
            id: 1,
            group: WindowGroup {
                id: 1,
                name: group.to_string(),
            },
            start_offset: start,
            end_offset: end,
            weekdays: WeekdayFlags::only(days),
            holidays: HolidayFlags::default(),
        }
    }

    fn event(s: &str, direction: Direction) -> AccessEvent {
        AccessEvent::new(make_datetime(s), direction)
    }

    const MARKER: &str = "[EXTRA]";

    // 2026-01-12 is a Monday

    /// RC-001: simple pair scenario
    #[test]
    fn test_rc_001_simple_pair() {
        let windows = vec![window("[EXTRA] Manhã", 9 * 3600, 11 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 09:30:00", Direction::Entry),
            event("2026-01-12 10:15:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log)
            .unwrap()
            .unwrap();

        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.total_seconds(), 2700);
        assert_eq!(
            log.lines().last().unwrap(),
            "Employee 1 - Ana worked a total of 00:45:00!"
        );
    }

    /// RC-002: relative outside window is re-evaluated as the next base
    #[test]
    fn test_rc_002_relative_outside_window_reevaluated() {
        let windows = vec![window("[EXTRA]", 7 * 3600, 8 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 07:30:00", Direction::Entry),
            event("2026-01-12 09:00:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log)
            .unwrap()
            .unwrap();

        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].duration_secs, 1800);
        assert!(
            log.lines()
                .iter()
                .any(|l| l == "Access 12/01/2026 09:00:00 does not fall under any extra-hours rule!")
        );
    }

    /// RC-003: no applicable rule produces exactly one trace line per event and no result
    #[test]
    fn test_rc_003_no_matching_window() {
        let windows = vec![window("[EXTRA]", 9 * 3600, 11 * 3600, &[Weekday::Mon])];
        let events = vec![event("2026-01-12 15:00:00", Direction::Entry)];
        let mut log = NarrativeLog::new();

        let result =
            reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log).unwrap();

        assert!(result.is_none());
        let rule_lines = log
            .lines()
            .iter()
            .filter(|l| l.contains("does not fall under any extra-hours rule"))
            .count();
        assert_eq!(rule_lines, 1);
    }

    /// RC-004: windows without the marker are ignored entirely
    #[test]
    fn test_rc_004_non_extra_windows_ignored() {
        let windows = vec![window("Comercial", 9 * 3600, 11 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 09:30:00", Direction::Entry),
            event("2026-01-12 10:15:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result =
            reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log).unwrap();

        assert!(result.is_none());
    }

    /// RC-005: non-access event types are filtered before pairing
    #[test]
    fn test_rc_005_non_access_events_filtered() {
        let windows = vec![window("[EXTRA]", 9 * 3600, 11 * 3600, &[Weekday::Mon])];
        let mut denied = event("2026-01-12 09:45:00", Direction::Exit);
        denied.event_type = 6;
        let events = vec![
            event("2026-01-12 09:30:00", Direction::Entry),
            denied,
            event("2026-01-12 10:15:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log)
            .unwrap()
            .unwrap();

        assert_eq!(result.spans.len(), 1);
        assert_eq!(result.spans[0].duration_secs, 2700);
        assert!(log.lines().contains(&"Number of accesses: 2".to_string()));
    }

    #[test]
    fn test_multiple_days_accumulate() {
        let windows = vec![window(
            "[EXTRA]",
            18 * 3600,
            20 * 3600,
            &[Weekday::Mon, Weekday::Tue],
        )];
        let events = vec![
            event("2026-01-12 18:00:00", Direction::Entry),
            event("2026-01-12 19:00:00", Direction::Exit),
            event("2026-01-13 18:30:00", Direction::Entry),
            event("2026-01-13 20:00:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log)
            .unwrap()
            .unwrap();

        assert_eq!(result.spans.len(), 2);
        assert_eq!(result.total_seconds(), 3600 + 5400);
    }

    #[test]
    fn test_out_of_order_events_fail() {
        let windows = vec![window("[EXTRA]", 9 * 3600, 11 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 10:30:00", Direction::Entry),
            event("2026-01-12 09:30:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log);
        assert!(matches!(result, Err(EngineError::NegativeDuration { .. })));
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let windows = vec![window("[EXTRA]", 7 * 3600, 8 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 07:10:00", Direction::Exit),
            event("2026-01-12 07:30:00", Direction::Entry),
            event("2026-01-12 09:00:00", Direction::Exit),
        ];

        let mut first_log = NarrativeLog::new();
        let first =
            reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut first_log)
                .unwrap();
        let mut second_log = NarrativeLog::new();
        let second =
            reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut second_log)
                .unwrap();

        assert_eq!(first, second);
        assert_eq!(first_log, second_log);
    }

    /// RC-006: an exit followed by an in-window entry opens the exit at the window
    /// start, then the entry becomes the next base
    #[test]
    fn test_rc_006_exit_then_entry_in_window() {
        let windows = vec![window("[EXTRA]", 7 * 3600, 8 * 3600, &[Weekday::Mon])];
        let events = vec![
            event("2026-01-12 07:10:00", Direction::Exit),
            event("2026-01-12 07:30:00", Direction::Entry),
            event("2026-01-12 09:00:00", Direction::Exit),
        ];
        let mut log = NarrativeLog::new();

        let result = reconcile_employee(&employee(1, "Ana"), &events, &windows, MARKER, &mut log)
            .unwrap()
            .unwrap();

        assert_eq!(result.spans.len(), 2);

        let first = &result.spans[0];
        assert!(first.entry.synthetic);
        assert_eq!(first.entry.timestamp, make_datetime("2026-01-12 07:00:00"));
        assert_eq!(first.exit.timestamp, make_datetime("2026-01-12 07:10:00"));
        assert_eq!(first.duration_secs, 600);

        let second = &result.spans[1];
        assert_eq!(second.entry.timestamp, make_datetime("2026-01-12 07:30:00"));
        assert!(!second.entry.synthetic);
        assert!(second.exit.synthetic);
        assert_eq!(second.exit.timestamp, make_datetime("2026-01-12 08:00:00"));
        assert_eq!(second.duration_secs, 1800);

        assert_eq!(result.total_seconds(), 2400);
        assert_eq!(
            log.lines().last().unwrap(),
            "Employee 1 - Ana worked a total of 00:40:00!"
        );
    }

    #[test]
    fn test_compare_names_ignores_accents_and_case() {
        assert_eq!(compare_names("Álvaro", "alberto"), Ordering::Greater);
        assert_eq!(compare_names("Érica", "Fabio"), Ordering::Less);
        assert_eq!(compare_names("ana", "Bruno"), Ordering::Less);
    }

    #[test]
    fn test_sort_by_name() {
        let make = |id, name: &str| EmployeeOvertimeResult {
            employee: employee(id, name),
            spans: vec![],
        };
        let mut results = vec![make(1, "Zé"), make(2, "Érica"), make(3, "bruno"), make(4, "Ana")];

        sort_by_name(&mut results);

        let names: Vec<&str> = results.iter().map(|r| r.employee.name.as_str()).collect();
        assert_eq!(names, vec!["Ana", "bruno", "Érica", "Zé"]);
    }
}
