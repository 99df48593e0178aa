//! Single-cell validation.

use std::sync::LazyLock;

use chrono::NaiveDate;
use harmonizer_model::{DataType, Field};
use regex::Regex;

use crate::issue::CellIssue;

/// Optional sign, no leading zeros unless the integer part is `0`, optional
/// fraction.
static DECIMAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-|\+|)(0|[1-9]\d*)(\.\d+)?$").expect("Invalid decimal regex")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Outcome of validating one cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellVerdict {
    pub issue: Option<CellIssue>,
}

impl CellVerdict {
    pub fn valid() -> Self {
        Self { issue: None }
    }

    pub fn invalid(issue: CellIssue) -> Self {
        Self { issue: Some(issue) }
    }

    pub fn is_valid(&self) -> bool {
        self.issue.is_none()
    }

    /// Human-readable reason, when invalid.
    pub fn reason(&self) -> Option<String> {
        self.issue.as_ref().map(ToString::to_string)
    }
}

/// Validate `value` against `field`. Never fails; invalid values get a
/// verdict carrying the issue.
pub fn validate_cell(value: &str, field: &Field) -> CellVerdict {
    let trimmed = value.trim();
    let issue = if trimmed.is_empty() {
        field.is_required().then_some(CellIssue::RequiredEmpty)
    } else {
        check_type(trimmed, field)
    };

    match issue {
        Some(_) if matches_any(value, &field.status_enumeration) => CellVerdict::valid(),
        Some(issue) => CellVerdict::invalid(issue),
        None => CellVerdict::valid(),
    }
}

fn check_type(trimmed: &str, field: &Field) -> Option<CellIssue> {
    match field.data_type {
        DataType::NonNegativeInteger => match trimmed.parse::<u64>() {
            Ok(number) if number.to_string() == trimmed => check_range(number as f64, field),
            _ => Some(CellIssue::NotAnInteger),
        },
        DataType::Decimal => {
            if !DECIMAL_REGEX.is_match(trimmed) {
                return Some(CellIssue::NotADecimal);
            }
            match trimmed.parse::<f64>() {
                Ok(number) => check_range(number, field),
                Err(_) => Some(CellIssue::NotADecimal),
            }
        }
        DataType::Date => (!is_strict_date(trimmed)).then_some(CellIssue::InvalidDate),
        DataType::Select => (!matches_any(trimmed, &field.flat_vocabulary)).then(|| {
            CellIssue::NotInVocabulary {
                value: trimmed.to_string(),
            }
        }),
        DataType::Multiple => check_selections(trimmed, &field.flat_vocabulary),
        DataType::Provenance | DataType::Text => None,
    }
}

fn check_range(number: f64, field: &Field) -> Option<CellIssue> {
    let below = field.min_value.is_some_and(|min| number < min);
    let above = field.max_value.is_some_and(|max| number > max);
    (below || above).then_some(CellIssue::OutOfRange {
        min: field.min_value,
        max: field.max_value,
    })
}

fn check_selections(value: &str, vocabulary: &[String]) -> Option<CellIssue> {
    for piece in value.split(';') {
        let piece = piece.trim();
        if piece.is_empty() {
            return Some(CellIssue::EmptySelection);
        }
        if !matches_any(piece, vocabulary) {
            return Some(CellIssue::NotInVocabulary {
                value: piece.to_string(),
            });
        }
    }
    None
}

/// Repair a multi-select value by dropping empty `;` slots (leading,
/// trailing or doubled separators) and rejoining with `"; "`.
///
/// Returns `None` when there is no empty slot to drop.
pub fn normalize_selections(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    let pieces: Vec<&str> = value.split(';').map(str::trim).collect();
    let kept: Vec<&str> = pieces.iter().copied().filter(|piece| !piece.is_empty()).collect();
    (kept.len() != pieces.len()).then(|| kept.join("; "))
}

/// Exactly `YYYY-MM-DD` and a real calendar date.
pub fn is_strict_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    let shape_ok = bytes.len() == 10
        && bytes.iter().enumerate().all(|(idx, byte)| match idx {
            4 | 7 => *byte == b'-',
            _ => byte.is_ascii_digit(),
        });
    shape_ok && NaiveDate::parse_from_str(value, DATE_FORMAT).is_ok()
}

/// Trimmed, case-insensitive membership.
pub fn matches_any(value: &str, candidates: &[String]) -> bool {
    let needle = value.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    candidates
        .iter()
        .any(|candidate| candidate.trim().to_lowercase() == needle)
}
