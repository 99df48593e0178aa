//! Cell validation issues.
//!
//! Each variant carries only the data its message needs.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const REQUIRED_EMPTY_MESSAGE: &str = "Required cells cannot be empty";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellIssue {
    /// Blank value in a required field.
    RequiredEmpty,
    /// Not a canonical non-negative integer.
    NotAnInteger,
    /// Does not match the decimal grammar.
    NotADecimal,
    /// Number outside the inclusive bounds.
    OutOfRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Not a `YYYY-MM-DD` calendar date.
    InvalidDate,
    /// A value (or `;`-separated piece) missing from the vocabulary.
    NotInVocabulary { value: String },
    /// An empty slot in a multi-select value.
    EmptySelection,
}

impl CellIssue {
    /// Short code used in reports.
    pub fn code(&self) -> &'static str {
        match self {
            CellIssue::RequiredEmpty => "required",
            CellIssue::NotAnInteger => "integer",
            CellIssue::NotADecimal => "decimal",
            CellIssue::OutOfRange { .. } => "range",
            CellIssue::InvalidDate => "date",
            CellIssue::NotInVocabulary { .. } => "vocabulary",
            CellIssue::EmptySelection => "selection",
        }
    }
}

impl fmt::Display for CellIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellIssue::RequiredEmpty => write!(f, "{REQUIRED_EMPTY_MESSAGE}"),
            CellIssue::NotAnInteger => write!(f, "Value must be a non-negative integer"),
            CellIssue::NotADecimal => write!(f, "Value must be a decimal number"),
            CellIssue::OutOfRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "Value must be between {min} and {max}"),
                (Some(min), None) => write!(f, "Value must be at least {min}"),
                (None, Some(max)) => write!(f, "Value must be at most {max}"),
                (None, None) => write!(f, "Value is out of range"),
            },
            CellIssue::InvalidDate => write!(f, "Date must be a valid YYYY-MM-DD date"),
            CellIssue::NotInVocabulary { value } => {
                write!(f, "{value:?} is not in the field vocabulary")
            }
            CellIssue::EmptySelection => write!(f, "Selections cannot be empty"),
        }
    }
}
