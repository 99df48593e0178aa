//! Export to a named format through the `exportField` rewrites.
//!
//! Only fields that carry rewrites for the format (on the field or on any of
//! its terms) are exported. A field rewrite names the export columns its
//! values go to, and may replace the value. A term rewrite takes precedence
//! for cells holding that term and defaults to the field's columns.

use harmonizer_model::{DataType, ExportTransform, Field, Matrix, Vocabulary, VocabularyTerm};
use indexmap::IndexSet;
use tracing::{debug, info};

use crate::error::MappingError;

/// Export table: one header row of export column names, then data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub format: String,
    pub headers: Vec<String>,
    pub rows: Matrix,
}

impl ExportTable {
    pub fn to_matrix(&self) -> Matrix {
        let mut matrix = Vec::with_capacity(self.rows.len() + 1);
        matrix.push(self.headers.clone());
        matrix.extend(self.rows.iter().cloned());
        matrix
    }
}

/// Format prefixes named anywhere in the fields, in first-seen order.
pub fn export_formats(fields: &[Field]) -> Vec<String> {
    let mut formats = IndexSet::new();
    for field in fields {
        formats.extend(field.export_field.keys().cloned());
        if let Some(vocabulary) = &field.vocabulary {
            visit_terms(vocabulary, &mut |term| {
                formats.extend(term.export_field.keys().cloned());
            });
        }
    }
    formats.into_iter().collect()
}

/// Depth-first, in authored order.
fn visit_terms<'a>(vocabulary: &'a Vocabulary, visit: &mut impl FnMut(&'a VocabularyTerm)) {
    for (_, term) in vocabulary.terms() {
        visit(term);
        if let Some(children) = &term.children {
            visit_terms(children, visit);
        }
    }
}

/// Column plan for one exported field.
struct FieldExport<'a> {
    col: usize,
    field: &'a Field,
    rewrites: &'a [ExportTransform],
    /// Columns a value goes to when no rewrite names one.
    targets: Vec<String>,
}

impl<'a> FieldExport<'a> {
    fn plan(col: usize, field: &'a Field, format: &str) -> Option<Self> {
        let rewrites = field
            .export_field
            .get(format)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if rewrites.is_empty() && term_rewrites(field, format).is_empty() {
            return None;
        }
        let mut targets: Vec<String> = rewrites
            .iter()
            .map(|rewrite| rewrite.field.clone().unwrap_or_else(|| field.name.clone()))
            .collect();
        if targets.is_empty() {
            targets.push(field.name.clone());
        }
        targets.dedup();
        Some(Self {
            col,
            field,
            rewrites,
            targets,
        })
    }

    /// Every export column this field can write, field columns first.
    fn columns(&self, format: &str) -> Vec<String> {
        let mut columns = self.targets.clone();
        for rewrite in term_rewrites(self.field, format) {
            if let Some(target) = &rewrite.field {
                columns.push(target.clone());
            }
        }
        columns
    }

    /// `(column, value)` pairs for one cell.
    fn values(&self, cell: &str, format: &str) -> Vec<(String, String)> {
        let selections: Vec<&str> = if self.field.data_type == DataType::Multiple {
            cell.split(';').map(str::trim).collect()
        } else {
            vec![cell.trim()]
        };
        let mut out = Vec::new();
        for selection in selections.into_iter().filter(|s| !s.is_empty()) {
            let matched = self
                .field
                .vocabulary
                .as_ref()
                .and_then(|vocabulary| vocabulary.find_ignore_case(selection))
                .and_then(|term| term.export_field.get(format))
                .filter(|rewrites| !rewrites.is_empty());
            match matched {
                Some(rewrites) => {
                    for rewrite in rewrites {
                        let value = rewrite.value.as_deref().unwrap_or(selection);
                        match &rewrite.field {
                            Some(target) => out.push((target.clone(), value.to_string())),
                            None => out.extend(
                                self.targets
                                    .iter()
                                    .map(|target| (target.clone(), value.to_string())),
                            ),
                        }
                    }
                }
                None if self.rewrites.is_empty() => {
                    out.push((self.field.name.clone(), selection.to_string()));
                }
                None => {
                    for rewrite in self.rewrites {
                        let target = rewrite.field.as_deref().unwrap_or(&self.field.name);
                        let value = rewrite.value.as_deref().unwrap_or(selection);
                        out.push((target.to_string(), value.to_string()));
                    }
                }
            }
        }
        out
    }
}

/// Term rewrites for `format` across a field's whole vocabulary.
fn term_rewrites<'a>(field: &'a Field, format: &str) -> Vec<&'a ExportTransform> {
    let mut out = Vec::new();
    if let Some(vocabulary) = &field.vocabulary {
        visit_terms(vocabulary, &mut |term| {
            if let Some(rewrites) = term.export_field.get(format) {
                out.extend(rewrites);
            }
        });
    }
    out
}

/// Rewrite data rows (in schema column order) into the export layout of
/// `format`.
///
/// Several values landing in the same export cell are joined with `"; "`
/// once each; empty rewritten values are dropped.
pub fn export_rows(
    fields: &[Field],
    rows: &[Vec<String>],
    format: &str,
) -> Result<ExportTable, MappingError> {
    let plans: Vec<FieldExport<'_>> = fields
        .iter()
        .enumerate()
        .filter_map(|(col, field)| FieldExport::plan(col, field, format))
        .collect();
    if plans.is_empty() {
        return Err(MappingError::UnknownExportFormat {
            format: format.to_string(),
            known: export_formats(fields),
        });
    }

    let headers: IndexSet<String> = plans.iter().flat_map(|plan| plan.columns(format)).collect();
    debug!(format, fields = plans.len(), columns = headers.len(), "planned export");

    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        let mut cells: Vec<IndexSet<String>> = vec![IndexSet::new(); headers.len()];
        for plan in &plans {
            let Some(cell) = row.get(plan.col) else {
                continue;
            };
            for (target, value) in plan.values(cell, format) {
                if value.is_empty() {
                    continue;
                }
                if let Some(idx) = headers.get_index_of(&target) {
                    cells[idx].insert(value);
                }
            }
        }
        out.push(
            cells
                .into_iter()
                .map(|values| values.into_iter().collect::<Vec<_>>().join("; "))
                .collect(),
        );
    }

    info!(format, rows = out.len(), columns = headers.len(), "exported rows");
    Ok(ExportTable {
        format: format.to_string(),
        headers: headers.into_iter().collect(),
        rows: out,
    })
}
