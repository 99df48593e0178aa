//! Serializable validation report.

use std::path::Path;

use harmonizer_model::InvalidCells;
use harmonizer_schema::CompiledSchema;
use serde::Serialize;

/// Invalid-cell count for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub column: usize,
    pub field: String,
    pub invalid: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub version: String,
    pub rows_checked: usize,
    pub invalid_rows: usize,
    pub invalid_cells: usize,
    /// Fields with at least one invalid cell, in column order.
    pub fields: Vec<FieldSummary>,
    /// Sparse row → column → reason map.
    pub cells: InvalidCells,
}

impl ValidationReport {
    pub fn new(
        schema: &CompiledSchema,
        invalid: &InvalidCells,
        rows_checked: usize,
        version: &str,
    ) -> Self {
        let mut counts = vec![0usize; schema.width()];
        for (_, col, _) in invalid.iter() {
            if let Some(count) = counts.get_mut(col) {
                *count += 1;
            }
        }
        let fields = schema
            .fields()
            .iter()
            .zip(counts)
            .enumerate()
            .filter(|(_, (_, count))| *count > 0)
            .map(|(column, (field, invalid))| FieldSummary {
                column,
                field: field.name.clone(),
                invalid,
            })
            .collect();

        Self {
            version: version.to_string(),
            rows_checked,
            invalid_rows: invalid.row_count(),
            invalid_cells: invalid.cell_count(),
            fields,
            cells: invalid.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.invalid_cells == 0
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
