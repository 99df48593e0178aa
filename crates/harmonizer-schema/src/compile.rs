//! Schema compilation: vocabulary flattening, `isBasedOn` resolution, case
//! normalization of vocabulary entries and the companion index.

use std::collections::HashMap;

use harmonizer_model::{Field, Schema, Vocabulary, normalize_case};
use tracing::debug;

use crate::companions::resolve_roles;
use crate::compiled::{CompiledSchema, SectionSpan};
use crate::error::{Result, SchemaError};

const INDENT: &str = "  ";

/// Depth-first pre-order linearization, two spaces of indent per level.
///
/// `{a: {itemList: {b: {}}}, c: {}}` flattens to `["a", "  b", "c"]`.
pub fn flatten_vocabulary(vocabulary: &Vocabulary) -> Vec<String> {
    let mut out = Vec::new();
    flatten_into(vocabulary, 0, &mut out);
    out
}

fn flatten_into(vocabulary: &Vocabulary, level: usize, out: &mut Vec<String>) {
    for (label, term) in vocabulary.terms() {
        out.push(format!("{}{label}", INDENT.repeat(level)));
        if let Some(children) = &term.children {
            flatten_into(children, level + 1, out);
        }
    }
}

/// Compile a loaded schema.
///
/// Flat vocabularies are always recomputed from the vocabulary trees, so
/// compiling an already compiled schema gives the same result.
pub fn compile(schema: &Schema) -> Result<CompiledSchema> {
    let mut fields: Vec<Field> = Vec::with_capacity(schema.field_count());
    let mut sections = Vec::with_capacity(schema.sections.len());
    let mut columns: HashMap<String, usize> = HashMap::new();

    for section in &schema.sections {
        let start = fields.len();
        for field in &section.fields {
            if columns.insert(field.name.clone(), fields.len()).is_some() {
                return Err(SchemaError::DuplicateField {
                    name: field.name.clone(),
                });
            }
            fields.push(field.clone());
        }
        sections.push(SectionSpan {
            name: section.name.clone(),
            start,
            end: fields.len(),
        });
    }

    let own: Vec<Vec<String>> = fields
        .iter()
        .map(|field| {
            field
                .vocabulary
                .as_ref()
                .map(flatten_vocabulary)
                .unwrap_or_default()
        })
        .collect();

    for (col, field) in fields.iter_mut().enumerate() {
        let mut flat = own[col].clone();
        if let Some(target) = &field.is_based_on {
            let Some(&source) = columns.get(target) else {
                return Err(SchemaError::UnknownBasedOn {
                    field: field.name.clone(),
                    target: target.clone(),
                });
            };
            flat.extend(own[source].iter().cloned());
        }
        if !field.capitalize.is_none() {
            for entry in flat.iter_mut().filter(|entry| !entry.is_empty()) {
                *entry = normalize_case(entry, field.capitalize);
            }
        }
        field.flat_vocabulary = flat;
    }

    let roles = resolve_roles(&fields, &columns)?;
    debug!(
        fields = fields.len(),
        sections = sections.len(),
        companions = roles.iter().filter(|role| role.is_companion()).count(),
        "compiled schema"
    );

    Ok(CompiledSchema::new(fields, sections, columns, roles))
}
