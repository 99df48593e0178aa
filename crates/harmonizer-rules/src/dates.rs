//! Date granularity truncation for `[X][X unit]` date fields.

use std::fmt;

/// Placeholder for a month that a `month` granularity needs but the date
/// lacks. It keeps the value an invalid date so it gets flagged.
pub const MONTH_SENTINEL: &str = "__";

const FIRST: &str = "01";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateGranularity {
    Year,
    Month,
    Day,
}

impl DateGranularity {
    /// Parse a unit cell value. Only the exact vocabulary labels match.
    pub fn from_unit(unit: &str) -> Option<Self> {
        match unit {
            "year" => Some(DateGranularity::Year),
            "month" => Some(DateGranularity::Month),
            "day" => Some(DateGranularity::Day),
            _ => None,
        }
    }

    /// True for the granularities that rewrite a date.
    pub fn truncates(&self) -> bool {
        !matches!(self, DateGranularity::Day)
    }
}

impl fmt::Display for DateGranularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DateGranularity::Year => "year",
            DateGranularity::Month => "month",
            DateGranularity::Day => "day",
        };
        write!(f, "{label}")
    }
}

/// Truncate an ISO date (or a leading part of one) to `granularity`.
///
/// `year` gives `Y-01-01`, `month` gives `Y-M-01` with [`MONTH_SENTINEL`] as
/// the month when there is none, `day` leaves the value alone. A value with
/// an empty year part is returned unchanged.
pub fn truncate_date(value: &str, granularity: DateGranularity) -> String {
    let mut parts: Vec<&str> = value.split('-').collect();
    if parts[0].is_empty() {
        return value.to_string();
    }
    if parts.len() < 3 && granularity.truncates() {
        parts.resize(3, "");
    }
    match granularity {
        DateGranularity::Year => {
            parts[1] = FIRST;
            parts[2] = FIRST;
        }
        DateGranularity::Month => {
            if parts[1].is_empty() {
                parts[1] = MONTH_SENTINEL;
            }
            parts[2] = FIRST;
        }
        DateGranularity::Day => {}
    }
    parts.join("-")
}
