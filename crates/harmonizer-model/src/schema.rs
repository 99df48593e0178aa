//! Section / field schema as loaded from a template.
//!
//! The JSON shape is the one template files use: a top-level array of
//! sections, each with its fields under `children`, vocabularies nested under
//! `itemList`:
//!
//! ```json
//! [{"name": "Host information", "children": [
//!     {"name": "host age", "dataType": "xs:decimal", "valueRequired": "recommended"},
//!     {"name": "host gender", "dataType": "select",
//!      "itemList": {"Female": {}, "Male": {}, "Other": {"itemList": {"Non-binary": {}}}}}
//! ]}]
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::case::CaseMode;
use crate::data_type::{DataType, ValueRequirement};

/// A whole template schema: ordered sections of ordered fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    pub sections: Vec<Section>,
}

impl Schema {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// All fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.sections.iter().flat_map(|section| section.fields.iter())
    }

    pub fn field_count(&self) -> usize {
        self.sections.iter().map(|section| section.fields.len()).sum()
    }
}

/// A named group of fields rendered as one header group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    #[serde(rename = "children", default)]
    pub fields: Vec<Field>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }
}

/// One schema column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub identifier: String,
    pub name: String,
    #[serde(default)]
    pub data_type: DataType,
    #[serde(default)]
    pub value_required: ValueRequirement,
    #[serde(default)]
    pub capitalize: CaseMode,
    /// Nested controlled vocabulary as authored.
    #[serde(rename = "itemList", default, skip_serializing_if = "Option::is_none")]
    pub vocabulary: Option<Vocabulary>,
    /// Depth-first linearization of `vocabulary` (plus any `is_based_on`
    /// vocabulary). Filled by the schema compiler.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flat_vocabulary: Vec<String>,
    #[serde(
        default,
        deserialize_with = "de::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_based_on: Option<String>,
    #[serde(
        default,
        deserialize_with = "de::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub status_enumeration: Vec<String>,
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_value: Option<f64>,
    #[serde(
        default,
        deserialize_with = "de::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_value: Option<f64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub guidance: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub examples: String,
    /// Column and value rewrites per export format prefix.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub export_field: ExportFields,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_requirement(mut self, requirement: ValueRequirement) -> Self {
        self.value_required = requirement;
        self
    }

    #[must_use]
    pub fn with_capitalize(mut self, mode: CaseMode) -> Self {
        self.capitalize = mode;
        self
    }

    #[must_use]
    pub fn with_vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = Some(vocabulary);
        self
    }

    #[must_use]
    pub fn with_based_on(mut self, field: impl Into<String>) -> Self {
        self.is_based_on = Some(field.into());
        self
    }

    #[must_use]
    pub fn with_status_enumeration<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.status_enumeration = values.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_value = min;
        self.max_value = max;
        self
    }

    pub fn is_required(&self) -> bool {
        self.value_required.is_required()
    }

    #[must_use]
    pub fn with_export(
        mut self,
        format: impl Into<String>,
        transforms: Vec<ExportTransform>,
    ) -> Self {
        self.export_field.insert(format.into(), transforms);
        self
    }
}

/// Export rewrites keyed by format prefix (`EXPORT_<prefix>` sheet columns).
pub type ExportFields = IndexMap<String, Vec<ExportTransform>>;

/// One rewrite for an export format.
///
/// `field` redirects the value to another export column, `value` replaces it.
/// An empty `value` clears it. Both absent is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTransform {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ExportTransform {
    pub fn to_field(field: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            value: None,
        }
    }

    pub fn to_value(value: impl Into<String>) -> Self {
        Self {
            field: None,
            value: Some(value.into()),
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

/// An ordered tree of vocabulary terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    terms: IndexMap<String, VocabularyTerm>,
}

/// A vocabulary term; the label is the key in the parent [`Vocabulary`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    #[serde(rename = "itemList", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vocabulary>,
    #[serde(rename = "exportField", default, skip_serializing_if = "IndexMap::is_empty")]
    pub export_field: ExportFields,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a flat (single level) vocabulary from labels.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = Self::new();
        for label in labels {
            vocabulary.insert(label);
        }
        vocabulary
    }

    /// Insert a term (or return the existing one) and give access to it.
    pub fn insert(&mut self, label: impl Into<String>) -> &mut VocabularyTerm {
        self.terms.entry(label.into()).or_default()
    }

    /// Insert a term with its own child terms.
    #[must_use]
    pub fn with_child(mut self, label: impl Into<String>, children: Vocabulary) -> Self {
        self.insert(label).children = Some(children);
        self
    }

    #[must_use]
    pub fn with_term(mut self, label: impl Into<String>) -> Self {
        self.insert(label);
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = (&str, &VocabularyTerm)> {
        self.terms.iter().map(|(label, term)| (label.as_str(), term))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Depth-first search ignoring ASCII case, as cell values may have been
    /// case-normalized.
    pub fn find_ignore_case(&self, label: &str) -> Option<&VocabularyTerm> {
        self.terms.iter().find_map(|(key, term)| {
            if key.eq_ignore_ascii_case(label) {
                return Some(term);
            }
            term.children
                .as_ref()
                .and_then(|children| children.find_ignore_case(label))
        })
    }

    /// Depth-first search for the term labelled `label`.
    pub fn find_mut(&mut self, label: &str) -> Option<&mut VocabularyTerm> {
        if self.terms.contains_key(label) {
            return self.terms.get_mut(label);
        }
        for term in self.terms.values_mut() {
            if let Some(children) = term.children.as_mut()
                && let Some(found) = children.find_mut(label)
            {
                return Some(found);
            }
        }
        None
    }
}

impl VocabularyTerm {
    /// Child vocabulary, created on first use.
    pub fn children_mut(&mut self) -> &mut Vocabulary {
        self.children.get_or_insert_with(Vocabulary::new)
    }
}

mod de {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub(super) fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }

    pub(super) fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Vec<String>>::deserialize(deserializer)?;
        Ok(raw.unwrap_or_default())
    }

    /// Bounds are written as numbers, numeric strings or empty strings.
    pub(super) fn optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<NumberOrText>::deserialize(deserializer)? {
            None => Ok(None),
            Some(NumberOrText::Number(value)) => Ok(Some(value)),
            Some(NumberOrText::Text(text)) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|_| serde::de::Error::custom(format!("invalid bound: {trimmed:?}")))
            }
        }
    }
}
