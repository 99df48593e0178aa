use std::collections::HashMap;
use std::fmt::Write as _;

use harmonizer_model::{Field, HeaderRows, Schema, Section};

use crate::companions::ColumnRole;

/// Column range covered by one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpan {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl SectionSpan {
    pub fn columns(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Output of [`crate::compile`]: fields in column order with their flat
/// vocabularies, section spans, the name lookup and companion roles.
#[derive(Debug, Clone)]
pub struct CompiledSchema {
    fields: Vec<Field>,
    sections: Vec<SectionSpan>,
    columns: HashMap<String, usize>,
    roles: Vec<ColumnRole>,
}

impl CompiledSchema {
    pub(crate) fn new(
        fields: Vec<Field>,
        sections: Vec<SectionSpan>,
        columns: HashMap<String, usize>,
        roles: Vec<ColumnRole>,
    ) -> Self {
        Self {
            fields,
            sections,
            columns,
            roles,
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field(&self, col: usize) -> Option<&Field> {
        self.fields.get(col)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.fields.len()
    }

    pub fn sections(&self) -> &[SectionSpan] {
        &self.sections
    }

    pub fn column_of(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    pub fn role(&self, col: usize) -> ColumnRole {
        self.roles.get(col).copied().unwrap_or_default()
    }

    /// Canonical two-row header: section names over field names.
    pub fn header_rows(&self) -> HeaderRows {
        let mut primary = Vec::with_capacity(self.fields.len());
        for span in &self.sections {
            for col in span.columns() {
                if col == span.start {
                    primary.push(span.name.clone());
                } else {
                    primary.push(String::new());
                }
            }
        }
        HeaderRows {
            primary,
            secondary: self.fields.iter().map(|field| field.name.clone()).collect(),
        }
    }

    /// Columns shown when only required fields are displayed.
    pub fn required_columns(&self) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.is_required())
            .map(|(col, _)| col)
            .collect()
    }

    /// Plain-text help for one field.
    pub fn field_reference(&self, col: usize) -> Option<String> {
        let field = self.fields.get(col)?;
        let mut text = String::new();
        let _ = writeln!(text, "Label: {}", field.name);
        let _ = writeln!(text, "Description: {}", field.description);
        let _ = writeln!(text, "Guidance: {}", field.guidance);
        let _ = writeln!(text, "Examples: {}", field.examples);
        if !field.status_enumeration.is_empty() {
            let _ = writeln!(text, "Null values: {}", field.status_enumeration.join("; "));
        }
        Some(text)
    }

    /// Back to the sectioned form, with compiled flat vocabularies.
    pub fn to_schema(&self) -> Schema {
        Schema::new(
            self.sections
                .iter()
                .map(|span| Section {
                    name: span.name.clone(),
                    fields: self.fields[span.columns()].to_vec(),
                })
                .collect(),
        )
    }
}
