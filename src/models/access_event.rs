//! Access event model and related types.
//!
//! This module defines the [`AccessEvent`] struct and [`Direction`] enum for
//! representing raw badge-in/badge-out events read from the access-control device.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Device event-type code for a granted access. Only these events are reconciled.
pub const ACCESS_EVENT_TYPE: u32 = 7;

/// The direction of an access event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Badge-in.
    Entry,
    /// Badge-out.
    Exit,
}

impl Direction {
    /// Returns the complementary direction.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Entry => Direction::Exit,
            Direction::Exit => Direction::Entry,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Entry => write!(f, "ENTRY"),
            Direction::Exit => write!(f, "EXIT"),
        }
    }
}

fn default_event_type() -> u32 {
    ACCESS_EVENT_TYPE
}

/// A single access event.
///
/// Events for one employee are always handled in ascending timestamp order.
///
/// # Example
///
/// ```
/// use overtime_engine::models::{AccessEvent, Direction};
/// use chrono::NaiveDateTime;
///
/// let at = NaiveDateTime::parse_from_str("2026-01-12 09:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
/// let event = AccessEvent::new(at, Direction::Entry);
/// assert!(event.is_access());
/// assert!(!event.synthetic);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessEvent {
    /// Wall-clock time of the event.
    pub timestamp: NaiveDateTime,
    /// Whether the employee entered or left.
    pub direction: Direction,
    /// Device event-type code.
    #[serde(default = "default_event_type")]
    pub event_type: u32,
    /// True when the event was fabricated at a window boundary.
    #[serde(default)]
    pub synthetic: bool,
}

impl AccessEvent {
    /// Creates a real access event (type 7).
    pub fn new(timestamp: NaiveDateTime, direction: Direction) -> Self {
        Self {
            timestamp,
            direction,
            event_type: ACCESS_EVENT_TYPE,
            synthetic: false,
        }
    }

    /// Creates a synthetic access event standing in for a missing counterpart.
    pub fn synthetic(timestamp: NaiveDateTime, direction: Direction) -> Self {
        Self {
            synthetic: true,
            ..Self::new(timestamp, direction)
        }
    }

    /// Returns true if this is an access (type 7) event.
    pub fn is_access(&self) -> bool {
        self.event_type == ACCESS_EVENT_TYPE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_direction_opposite() {
        assert_eq!(Direction::Entry.opposite(), Direction::Exit);
        assert_eq!(Direction::Exit.opposite(), Direction::Entry);
    }

    #[test]
    fn test_direction_display() {
        assert_eq!(Direction::Entry.to_string(), "ENTRY");
        assert_eq!(Direction::Exit.to_string(), "EXIT");
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Entry).unwrap(), "\"entry\"");
        assert_eq!(serde_json::to_string(&Direction::Exit).unwrap(), "\"exit\"");
    }

    #[test]
    fn test_deserialize_event_defaults() {
        let json = r#"{ "timestamp": "2026-01-12T09:30:00", "direction": "entry" }"#;

        let event: AccessEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.timestamp, make_datetime("2026-01-12 09:30:00"));
        assert_eq!(event.event_type, ACCESS_EVENT_TYPE);
        assert!(!event.synthetic);
    }

    #[test]
    fn test_synthetic_event_is_flagged() {
        let event = AccessEvent::synthetic(make_datetime("2026-01-12 11:00:00"), Direction::Exit);
        assert!(event.synthetic);
        assert!(event.is_access());
    }

    #[test]
    fn test_non_access_event_type() {
        let mut event = AccessEvent::new(make_datetime("2026-01-12 11:00:00"), Direction::Exit);
        event.event_type = 3;
        assert!(!event.is_access());
    }
}
