//! Field-dependency rules.
//!
//! Companion fields follow a base field `X` as `"X unit"` and/or `"X bin"`.
//! Editing the base or its unit re-derives the bin (month units are converted
//! to years), and a date base is truncated to the granularity named by its
//! unit.

pub mod bins;
pub mod dates;
pub mod engine;

pub use bins::{leading_number, select_bin};
pub use dates::{DateGranularity, MONTH_SENTINEL, truncate_date};
pub use engine::{EditOutcome, RuleEngine};
