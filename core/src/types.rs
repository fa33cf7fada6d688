//! Shared primitive types used across the entire generator.

use chrono::NaiveDate;

/// A calendar day. All generated dates are whole days.
pub type Day = NaiveDate;

/// Sequential identifier for any generated row. Starts at 1.
pub type RowId = u64;

/// ISO `YYYY-MM-DD`, the only date format written or parsed.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Round a monetary amount to cents.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Round to four decimal places (p-values).
pub fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Parse an ISO date, mapping failure onto the crate error.
pub fn parse_day(value: &str) -> crate::error::SimResult<Day> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        crate::error::SimError::InvalidDate {
            value: value.to_string(),
        }
    })
}
