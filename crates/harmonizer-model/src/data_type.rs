//! Type-safe enumerations for field metadata.
//!
//! Schema files describe data types and requirement levels as strings. These
//! enums are the single closed representation every component dispatches on.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// Data type of a field, as declared by the schema `dataType` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DataType {
    /// Free text. Any label outside the closed set maps here (`xs:token`, `xs:string`).
    #[default]
    Text,
    /// `xs:nonNegativeInteger`
    NonNegativeInteger,
    /// `xs:decimal`
    Decimal,
    /// `xs:date`, strictly `YYYY-MM-DD`.
    Date,
    /// `select`: one term of the field vocabulary.
    Select,
    /// `multiple`: `;`-separated terms of the field vocabulary.
    Multiple,
    /// `provenance`: application version stamp.
    Provenance,
}

impl DataType {
    /// Returns the label as written in schema files.
    pub fn as_str(&self) -> &'static str {
        match self {
            DataType::Text => "xs:token",
            DataType::NonNegativeInteger => "xs:nonNegativeInteger",
            DataType::Decimal => "xs:decimal",
            DataType::Date => "xs:date",
            DataType::Select => "select",
            DataType::Multiple => "multiple",
            DataType::Provenance => "provenance",
        }
    }

    /// Returns true for types whose values come from a vocabulary.
    pub fn has_vocabulary(&self) -> bool {
        matches!(self, DataType::Select | DataType::Multiple)
    }

    /// Returns true for types holding a number.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::NonNegativeInteger | DataType::Decimal)
    }

    /// Parse a schema label. Unknown labels are plain text.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "xs:nonNegativeInteger" => DataType::NonNegativeInteger,
            "xs:decimal" => DataType::Decimal,
            "xs:date" => DataType::Date,
            "select" => DataType::Select,
            "multiple" => DataType::Multiple,
            "provenance" => DataType::Provenance,
            _ => DataType::Text,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for DataType {
    fn from(label: String) -> Self {
        DataType::from_label(&label)
    }
}

impl From<DataType> for String {
    fn from(data_type: DataType) -> Self {
        data_type.as_str().to_string()
    }
}

/// Requirement level of a field (`valueRequired`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ValueRequirement {
    /// Empty cells are invalid.
    Required,
    /// Highlighted in headers, empty cells are still valid.
    Recommended,
    #[default]
    Optional,
}

impl ValueRequirement {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueRequirement::Required => "required",
            ValueRequirement::Recommended => "recommended",
            ValueRequirement::Optional => "",
        }
    }

    pub fn is_required(&self) -> bool {
        *self == ValueRequirement::Required
    }
}

impl fmt::Display for ValueRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueRequirement::Optional => write!(f, "optional"),
            other => write!(f, "{}", other.as_str()),
        }
    }
}

impl FromStr for ValueRequirement {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "required" => Ok(ValueRequirement::Required),
            "recommended" => Ok(ValueRequirement::Recommended),
            "" | "optional" => Ok(ValueRequirement::Optional),
            _ => Err(ModelError::UnknownRequirement(s.to_string())),
        }
    }
}

impl Serialize for ValueRequirement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ValueRequirement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.as_deref()
            .unwrap_or("")
            .parse()
            .map_err(serde::de::Error::custom)
    }
}
