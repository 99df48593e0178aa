//! Case normalization applied to vocabulary entries and edited values.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Capitalization rule declared by a field (`capitalize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CaseMode {
    #[default]
    None,
    Upper,
    Lower,
    Title,
}

impl CaseMode {
    /// Returns the label as written in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::None => "",
            CaseMode::Upper => "UPPER",
            CaseMode::Lower => "lower",
            CaseMode::Title => "Title",
        }
    }

    pub fn is_none(&self) -> bool {
        *self == CaseMode::None
    }

    /// Apply this mode to `value`. See [`normalize_case`].
    pub fn apply(&self, value: &str) -> String {
        normalize_case(value, *self)
    }
}

impl fmt::Display for CaseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaseMode::None => write!(f, "none"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for CaseMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "none" => Ok(CaseMode::None),
            "upper" => Ok(CaseMode::Upper),
            "lower" => Ok(CaseMode::Lower),
            "title" => Ok(CaseMode::Title),
            _ => Err(ModelError::UnknownCaseMode(s.to_string())),
        }
    }
}

impl Serialize for CaseMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CaseMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.as_deref()
            .unwrap_or("")
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Change the case of `value` according to `mode`.
///
/// - `Lower` / `Upper` change every word character and nothing else.
/// - `Title` uppercases the first character of the string and every word
///   character that directly follows a non-word character. Other characters
///   keep their case, so `"covid-19 test"` becomes `"Covid-19 Test"`.
/// - `None` returns the value unchanged.
pub fn normalize_case(value: &str, mode: CaseMode) -> String {
    match mode {
        CaseMode::None => value.to_string(),
        CaseMode::Lower => {
            let mut out = String::with_capacity(value.len());
            for ch in value.chars() {
                if is_word_char(ch) {
                    out.extend(ch.to_lowercase());
                } else {
                    out.push(ch);
                }
            }
            out
        }
        CaseMode::Upper => {
            let mut out = String::with_capacity(value.len());
            for ch in value.chars() {
                if is_word_char(ch) {
                    out.extend(ch.to_uppercase());
                } else {
                    out.push(ch);
                }
            }
            out
        }
        CaseMode::Title => {
            let mut out = String::with_capacity(value.len());
            let mut previous: Option<char> = None;
            for ch in value.chars() {
                let starts_word = match previous {
                    None => true,
                    Some(prev) => !is_word_char(prev) && is_word_char(ch),
                };
                if starts_word {
                    out.extend(ch.to_uppercase());
                } else {
                    out.push(ch);
                }
                previous = Some(ch);
            }
            out
        }
    }
}
