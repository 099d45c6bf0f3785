//! Core data models for the Overtime Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod access_event;
mod employee;
mod overtime_result;
mod report_range;
mod schedule_window;

pub use access_event::{ACCESS_EVENT_TYPE, AccessEvent, Direction};
pub use employee::Employee;
pub use overtime_result::{EmployeeOvertimeResult, NarrativeLog, WorkedSpan};
pub use report_range::ReportRange;
pub use schedule_window::{
    DEFAULT_EXTRA_HOURS_MARKER, HolidayFlags, ScheduleWindow, WeekdayFlags, WindowGroup,
};
