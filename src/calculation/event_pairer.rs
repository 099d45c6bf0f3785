//! Event pairing.
//!
//! This module pairs an access event with its counterpart inside a matched
//! extra-hours window, synthesizing a boundary event when no valid real
//! counterpart exists.
//!
//! Pairing is a pure function of `(events, cursor, window)`: it returns the
//! cursor to continue from, the span it produced (if any) and the narrative
//! lines describing the decision.

use crate::error::{EngineError, EngineResult};
use crate::models::{AccessEvent, Direction, ScheduleWindow, WorkedSpan};

use super::pay::format_duration;
use super::window_matcher::{WindowBounds, pairing_bounds};

/// The outcome of pairing the event at a cursor position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairingStep {
    /// Index of the next event to evaluate as a base.
    pub next_cursor: usize,
    /// The span produced, if any.
    pub span: Option<WorkedSpan>,
    /// Narrative lines for this decision, in order.
    pub trace: Vec<String>,
}

pub(crate) fn format_timestamp(event: &AccessEvent) -> String {
    event.timestamp.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// The synthetic event at the opposite window boundary for `base`.
///
/// An entry is closed at the window end; an exit is opened at the window start.
fn boundary_counterpart(base: &AccessEvent, bounds: &WindowBounds) -> AccessEvent {
    match base.direction {
        Direction::Entry => AccessEvent::synthetic(bounds.end, Direction::Exit),
        Direction::Exit => AccessEvent::synthetic(bounds.start, Direction::Entry),
    }
}

/// Pairs the event at `cursor` inside `window`.
///
/// `window` must be the window matched for `events[cursor]`. Events are
/// assumed to be in ascending timestamp order.
///
/// # Errors
///
/// Returns [`EngineError::InvalidData`] if `cursor` is out of range, and
/// [`EngineError::NegativeDuration`] if the produced span would end before it
/// starts (only possible with out-of-order events).
///
/// # Example
///
/// ```
/// use overtime_engine::calculation::pair_at;
/// use overtime_engine::models::{
///     AccessEvent, Direction, HolidayFlags, ScheduleWindow, WeekdayFlags, WindowGroup,
/// };
/// use chrono::NaiveDateTime;
///
/// let at = |s| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap();
/// let window = ScheduleWindow {
///     id: 1,
///     group: WindowGroup { id: 1, name: "[EXTRA]".to_string() },
///     start_offset: 9 * 3600,
///     end_offset: 11 * 3600,
///     weekdays: WeekdayFlags::every_day(),
///     holidays: HolidayFlags::default(),
/// };
/// let events = vec![
///     AccessEvent::new(at("2026-01-12 09:30:00"), Direction::Entry),
///     AccessEvent::new(at("2026-01-12 10:15:00"), Direction::Exit),
/// ];
///
/// let step = pair_at(&events, 0, &window).unwrap();
/// assert_eq!(step.next_cursor, 2);
/// assert_eq!(step.span.unwrap().duration_secs, 2700);
/// ```
pub fn pair_at(
    events: &[AccessEvent],
    cursor: usize,
    window: &ScheduleWindow,
) -> EngineResult<PairingStep> {
    let base = events.get(cursor).ok_or_else(|| EngineError::InvalidData {
        message: format!(
            "pairing cursor {} is past the end of {} events",
            cursor,
            events.len()
        ),
    })?;

    let bounds = pairing_bounds(window, base.timestamp.date());

    if !bounds.contains(base.timestamp) {
        return Ok(PairingStep {
            next_cursor: cursor + 1,
            span: None,
            trace: vec![format!(
                "Access {} is not an extra-hours access!",
                format_timestamp(base)
            )],
        });
    }

    let mut trace = Vec::new();

    let (counterpart, consumed) = match events.get(cursor + 1) {
        None => {
            let synthetic = boundary_counterpart(base, &bounds);
            trace.push(format!(
                "No relative access found! Using {} ({})",
                format_timestamp(&synthetic),
                synthetic.direction
            ));
            (synthetic, 1)
        }
        Some(relative) if !bounds.contains(relative.timestamp) => {
            let synthetic = boundary_counterpart(base, &bounds);
            trace.push(format!(
                "Access {} is not an extra-hours access! It will be replaced by {}",
                format_timestamp(relative),
                format_timestamp(&synthetic)
            ));
            (synthetic, 1)
        }
        Some(relative) => match (base.direction, relative.direction) {
            (Direction::Entry, Direction::Exit) => (relative.clone(), 2),
            (Direction::Exit, Direction::Entry) => {
                // An entry after an exit cannot close it; the exit is opened at the window start.
                let synthetic = boundary_counterpart(base, &bounds);
                trace.push(format!(
                    "Access {} is not an extra-hours access! It will be replaced by {}",
                    format_timestamp(relative),
                    format_timestamp(&synthetic)
                ));
                (synthetic, 1)
            }
            _ => {
                trace.push(format!(
                    "Base: {} ({}) | Relative: {} ({}) | Consecutive {} accesses, no span counted",
                    format_timestamp(base),
                    base.direction,
                    format_timestamp(relative),
                    relative.direction,
                    base.direction
                ));
                return Ok(PairingStep {
                    next_cursor: cursor + 1,
                    span: None,
                    trace,
                });
            }
        },
    };

    let span = match base.direction {
        Direction::Entry => WorkedSpan::between(base.clone(), counterpart)?,
        Direction::Exit => WorkedSpan::between(counterpart, base.clone())?,
    };

    let relative = if base.direction == Direction::Entry {
        &span.exit
    } else {
        &span.entry
    };
    trace.push(format!(
        "Base: {} ({}) | Relative: {} ({}) | Duration: {}",
        format_timestamp(base),
        base.direction,
        format_timestamp(relative),
        relative.direction,
        format_duration(span.duration_secs)
    ));

    Ok(PairingStep {
        next_cursor: cursor + consumed,
        span: Some(span),
        trace,
    })
}
