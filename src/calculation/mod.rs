//! Calculation logic for the Overtime Engine.
//!
//! This module contains the pure reconciliation core: window matching,
//! event pairing, per-employee reconciliation, and duration and pay
//! formatting. Nothing here performs I/O.

mod event_pairer;
mod pay;
mod reconciler;
mod window_matcher;

pub use event_pairer::{PairingStep, pair_at};
pub use pay::{format_amount, format_duration, overtime_amount};
pub use reconciler::{compare_names, reconcile_employee, sort_by_name};
pub use window_matcher::{WindowBounds, find_active_window, matching_bounds, pairing_bounds};
