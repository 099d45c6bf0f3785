//! Schedule window model.
//!
//! A [`ScheduleWindow`] is a weekly time-of-day span configured on the device,
//! owned by a group. Only windows whose group name carries the extra-hours
//! marker are eligible for overtime.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Default marker identifying extra-hours groups by name.
pub const DEFAULT_EXTRA_HOURS_MARKER: &str = "[EXTRA]";

/// The group (device "time zone") that owns a schedule window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGroup {
    /// Group identifier.
    pub id: i64,
    /// Group name, e.g. "[EXTRA] Night shift".
    pub name: String,
}

/// Per-weekday applicability flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekdayFlags {
    /// Applies on Sunday.
    pub sunday: bool,
    /// Applies on Monday.
    pub monday: bool,
    /// Applies on Tuesday.
    pub tuesday: bool,
    /// Applies on Wednesday.
    pub wednesday: bool,
    /// Applies on Thursday.
    pub thursday: bool,
    /// Applies on Friday.
    pub friday: bool,
    /// Applies on Saturday.
    pub saturday: bool,
}

impl WeekdayFlags {
    /// Flags with every day set.
    pub fn every_day() -> Self {
        Self {
            sunday: true,
            monday: true,
            tuesday: true,
            wednesday: true,
            thursday: true,
            friday: true,
            saturday: true,
        }
    }

    /// Flags with only the given days set.
    ///
    /// # Example
    ///
    /// ```
    /// use overtime_engine::models::WeekdayFlags;
    /// use chrono::Weekday;
    ///
    /// let flags = WeekdayFlags::only(&[Weekday::Mon, Weekday::Fri]);
    /// assert!(flags.applies_to(Weekday::Mon));
    /// assert!(!flags.applies_to(Weekday::Tue));
    /// ```
    pub fn only(days: &[Weekday]) -> Self {
        let mut flags = Self::default();
        for day in days {
            *flags.flag_mut(*day) = true;
        }
        flags
    }

    /// Returns true if the flag for `weekday` is set.
    pub fn applies_to(&self, weekday: Weekday) -> bool {
        match weekday {
            Weekday::Sun => self.sunday,
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
        }
    }

    fn flag_mut(&mut self, weekday: Weekday) -> &mut bool {
        match weekday {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        }
    }
}

/// Holiday applicability flags as configured on the device.
///
/// Carried through for completeness; the reconciler does not consult them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayFlags {
    /// Applies on holiday type 1.
    pub holiday_1: bool,
    /// Applies on holiday type 2.
    pub holiday_2: bool,
    /// Applies on holiday type 3.
    pub holiday_3: bool,
}

/// A weekly schedule window.
///
/// Offsets are seconds since midnight on the day being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    /// Window identifier.
    pub id: i64,
    /// Owning group.
    pub group: WindowGroup,
    /// Start of the window, seconds since midnight.
    pub start_offset: u32,
    /// End of the window, seconds since midnight.
    pub end_offset: u32,
    /// Days of the week the window applies to.
    pub weekdays: WeekdayFlags,
    /// Holiday types the window applies to.
    #[serde(default)]
    pub holidays: HolidayFlags,
}

impl ScheduleWindow {
    /// Returns true if the owning group's name contains `marker`.
    pub fn is_extra_hours(&self, marker: &str) -> bool {
        self.group.name.contains(marker)
    }
}
