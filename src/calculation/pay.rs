//! Duration formatting and overtime pay.
//!
//! Worked time is tracked in whole seconds; pay is derived from the configured
//! hourly rate with decimal arithmetic.

use rust_decimal::{Decimal, RoundingStrategy};

const SECONDS_PER_HOUR: u64 = 3600;

/// Formats a number of seconds as `HH:MM:SS`. Hours are not wrapped at 24.
///
/// # Examples
///
/// ```
/// use overtime_engine::calculation::format_duration;
///
/// assert_eq!(format_duration(2700), "00:45:00");
/// assert_eq!(format_duration(90_061), "25:01:01");
/// ```
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / SECONDS_PER_HOUR;
    let minutes = (seconds % SECONDS_PER_HOUR) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Calculates the pay for `seconds` of overtime at `hourly_rate`, rounded to cents.
///
/// Midpoints round away from zero.
///
/// # Examples
///
/// ```
/// use overtime_engine::calculation::overtime_amount;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let rate = Decimal::from_str("15").unwrap();
/// assert_eq!(overtime_amount(2700, rate), Decimal::from_str("11.25").unwrap());
/// ```
pub fn overtime_amount(seconds: u64, hourly_rate: Decimal) -> Decimal {
    (Decimal::from(seconds) * hourly_rate / Decimal::from(SECONDS_PER_HOUR))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount in Brazilian style: `R$ 1234,50`.
pub fn format_amount(amount: Decimal) -> String {
    format!("R$ {:.2}", amount).replace('.', ",")
}
