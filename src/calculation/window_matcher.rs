//! Extra-hours window matching.
//!
//! This module decides which schedule window (if any) is active for an access
//! event, and computes the minute-level bounds used when pairing events.
//!
//! Two inclusion tests are layered:
//!
//! - **Matching** uses the window's exact second offsets with the end extended
//!   through its last millisecond (`HH:MM:SS.999`), plus the weekday flag.
//! - **Pairing** uses the same offsets truncated to the minute, and decides
//!   whether an event counts as inside the window once a window was matched.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::models::ScheduleWindow;

/// The instants a window spans on a specific calendar date.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::WindowBounds;
/// use chrono::NaiveDateTime;
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let bounds = WindowBounds { start: at("2026-01-12 09:00:00"), end: at("2026-01-12 11:00:00") };
/// assert!(bounds.contains(at("2026-01-12 09:00:00")));
/// assert!(!bounds.contains(at("2026-01-12 11:00:01")));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    /// First instant inside the window.
    pub start: NaiveDateTime,
    /// Last instant inside the window.
    pub end: NaiveDateTime,
}

impl WindowBounds {
    /// Returns true if `timestamp` lies within `[start, end]`.
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Midnight of `date` plus `seconds`; offsets past a day roll into the next date.
fn at_offset(date: NaiveDate, seconds: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::seconds(i64::from(seconds))
}

/// Bounds used to match an event to a window on `date`.
///
/// The end instant is inclusive through the last millisecond of its end second.
pub fn matching_bounds(window: &ScheduleWindow, date: NaiveDate) -> WindowBounds {
    WindowBounds {
        start: at_offset(date, window.start_offset),
        end: at_offset(date, window.end_offset) + TimeDelta::milliseconds(999),
    }
}

/// Bounds used to decide whether an event is inside a matched window for pairing.
///
/// Both edges are truncated to the minute.
pub fn pairing_bounds(window: &ScheduleWindow, date: NaiveDate) -> WindowBounds {
    WindowBounds {
        start: at_offset(date, window.start_offset - window.start_offset % 60),
        end: at_offset(date, window.end_offset - window.end_offset % 60),
    }
}

/// Finds the window active at `timestamp`.
///
/// A window is active when the timestamp lies inside its matching bounds on the
/// timestamp's date and the window applies to that weekday. The first active
/// window in slice order wins.
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::find_active_window;
/// use overtime_engine::models::{ScheduleWindow, WeekdayFlags, WindowGroup, HolidayFlags};
/// use chrono::{NaiveDateTime, Weekday};
///
/// let window = ScheduleWindow {
///     id: 1,
///     group: WindowGroup { id: 1, name: "[EXTRA] Morning".to_string() },
///     start_offset: 9 * 3600,
///     end_offset: 11 * 3600,
///     weekdays: WeekdayFlags::only(&[Weekday::Mon]),
///     holidays: HolidayFlags::default(),
/// };
///
/// // 2026-01-12 is a Monday, 2026-01-13 a Tuesday
/// let monday = NaiveDateTime::parse_from_str("2026-01-12 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let tuesday = NaiveDateTime::parse_from_str("2026-01-13 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let windows = [window];
///
/// assert!(find_active_window(monday, &windows).is_some());
/// assert!(find_active_window(tuesday, &windows).is_none());
/// ```
pub fn find_active_window(
    timestamp: NaiveDateTime,
    windows: &[ScheduleWindow],
) -> Option<&ScheduleWindow> {
    let date = timestamp.date();
    let weekday = timestamp.weekday();

    windows.iter().find(|window| {
        matching_bounds(window, date).contains(timestamp) && window.weekdays.applies_to(weekday)
    })
}
