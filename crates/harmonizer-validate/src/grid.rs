//! Whole-grid validation.

use harmonizer_model::{CellWrite, DataType, GridMut, GridView, InvalidCells};
use harmonizer_schema::CompiledSchema;
use tracing::{debug, info, info_span};

use crate::cell::validate_cell;
use crate::provenance::stamp_provenance;

/// Result of one validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationPass {
    pub invalid_cells: InvalidCells,
    /// Provenance stamps to apply; validation assumed they were applied.
    pub provenance_writes: Vec<CellWrite>,
}

impl ValidationPass {
    pub fn is_valid(&self) -> bool {
        self.invalid_cells.is_empty()
    }
}

pub struct GridValidator<'a> {
    schema: &'a CompiledSchema,
    version: String,
}

impl<'a> GridValidator<'a> {
    /// Validator stamping provenance with this crate's version.
    pub fn new(schema: &'a CompiledSchema) -> Self {
        Self {
            schema,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Validate every non-empty row. The invalid-cell map is built fresh.
    pub fn validate<G: GridView>(&self, grid: &G) -> ValidationPass {
        let _span = info_span!("validate_grid", rows = grid.row_count()).entered();
        let mut pass = ValidationPass::default();

        for row in 0..grid.row_count() {
            if grid.is_row_empty(row) {
                continue;
            }
            for (col, field) in self.schema.fields().iter().enumerate() {
                let current = grid.value_at(row, col);
                let stamped;
                let value = if field.data_type == DataType::Provenance {
                    stamped = stamp_provenance(current, &self.version);
                    if stamped != current {
                        pass.provenance_writes
                            .push(CellWrite::new(row, col, stamped.clone()));
                    }
                    stamped.as_str()
                } else {
                    current
                };

                if let Some(reason) = validate_cell(value, field).reason() {
                    debug!(row, column = col, field = %field.name, %reason, "invalid cell");
                    pass.invalid_cells.insert(row, col, reason);
                }
            }
        }

        info!(
            invalid_rows = pass.invalid_cells.row_count(),
            invalid_cells = pass.invalid_cells.cell_count(),
            stamped = pass.provenance_writes.len(),
            "validated grid"
        );
        pass
    }

    /// Validate, applying the provenance stamps to `grid` first.
    pub fn validate_in_place<G: GridMut>(&self, grid: &mut G) -> InvalidCells {
        let pass = self.validate(&*grid);
        grid.apply_writes(pass.provenance_writes);
        pass.invalid_cells
    }
}
