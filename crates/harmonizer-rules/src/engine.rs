//! Dependency rule engine.
//!
//! Two entry points share the same rules:
//! - [`RuleEngine::on_edit`] / [`RuleEngine::on_edits`] for user edits, which
//!   return the normalized edits plus the companion writes they trigger;
//! - [`RuleEngine::derive_matrix`] for imported data, which rewrites the
//!   matrix column by column, left to right.

use std::collections::{BTreeSet, HashMap};

use harmonizer_model::{CellWrite, DataType, Field, GridView, Matrix, normalize_case};
use harmonizer_schema::{ColumnRole, CompiledSchema};
use tracing::{debug, info};

use crate::bins::select_bin;
use crate::dates::{DateGranularity, truncate_date};

/// Result of a single edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    /// The edit with its value normalized (case, date granularity).
    pub edit: CellWrite,
    /// Companion cells to write as a consequence.
    pub writes: Vec<CellWrite>,
}

pub struct RuleEngine<'a> {
    schema: &'a CompiledSchema,
}

impl<'a> RuleEngine<'a> {
    pub fn new(schema: &'a CompiledSchema) -> Self {
        Self { schema }
    }

    /// Apply the rules to one edit, reading companion values from `grid`.
    pub fn on_edit<G: GridView>(&self, grid: &G, edit: CellWrite) -> EditOutcome {
        let CellWrite { row, col, value } = edit;
        let Some(field) = self.schema.field(col) else {
            return EditOutcome {
                edit: CellWrite { row, col, value },
                writes: Vec::new(),
            };
        };

        let mut value = capitalize(field, value);
        let mut writes = Vec::new();

        match self.schema.role(col) {
            ColumnRole::Base {
                unit: Some(unit),
                bin,
            } => {
                if field.data_type == DataType::Date {
                    if let Some(granularity) = DateGranularity::from_unit(grid.value_at(row, unit))
                        && granularity.truncates()
                    {
                        value = truncate_date(&value, granularity);
                    }
                } else if let Some(bin) = bin {
                    writes.extend(self.bin_write(row, &value, Some(grid.value_at(row, unit)), bin));
                }
            }
            ColumnRole::Base { unit: None, bin: Some(bin) } => {
                writes.extend(self.bin_write(row, &value, None, bin));
            }
            ColumnRole::Unit { base } => {
                writes.extend(self.unit_changed(grid, row, base, &value));
            }
            ColumnRole::Base { .. } | ColumnRole::Bin { .. } | ColumnRole::Plain => {}
        }

        EditOutcome {
            edit: CellWrite { row, col, value },
            writes,
        }
    }

    /// Apply the rules to a batch of edits.
    ///
    /// Each edit sees the grid with the earlier edits of the batch applied.
    /// Returns the normalized edits followed by one companion write per base
    /// whose value or unit the batch touched, computed from the final state
    /// of the batch. Companion writes come last, so a bin or date pasted
    /// together with its base is replaced by the derived value.
    pub fn on_edits<G: GridView>(&self, grid: &G, edits: Vec<CellWrite>) -> Vec<CellWrite> {
        let mut pending = PendingGrid::new(grid);
        let mut normalized = Vec::with_capacity(edits.len());
        let mut touched = BTreeSet::new();

        for edit in edits {
            match self.schema.role(edit.col) {
                ColumnRole::Base { .. } => {
                    touched.insert((edit.row, edit.col));
                }
                ColumnRole::Unit { base } => {
                    touched.insert((edit.row, base));
                }
                ColumnRole::Bin { .. } | ColumnRole::Plain => {}
            }
            let outcome = self.on_edit(&pending, edit);
            pending.stage(&outcome.edit);
            for write in &outcome.writes {
                pending.stage(write);
            }
            normalized.push(outcome.edit);
        }

        let companions: Vec<CellWrite> = touched
            .into_iter()
            .filter_map(|(row, base)| self.companion_write(&pending, row, base))
            .collect();
        debug!(
            edits = normalized.len(),
            companions = companions.len(),
            "applied edit rules"
        );
        normalized.extend(companions);
        normalized
    }

    /// Derive companion values over imported data rows.
    ///
    /// Columns are processed left to right, so a later column may read an
    /// earlier column's final value. Existing bin values are overwritten.
    pub fn derive_matrix(&self, mut rows: Matrix) -> Matrix {
        let width = self.schema.width();
        for row in &mut rows {
            if row.len() < width {
                row.resize(width, String::new());
            }
        }

        for (col, field) in self.schema.fields().iter().enumerate() {
            let mut changed = 0usize;

            if !field.capitalize.is_none() {
                for row in &mut rows {
                    if row[col].is_empty() {
                        continue;
                    }
                    let normalized = normalize_case(&row[col], field.capitalize);
                    if normalized != row[col] {
                        row[col] = normalized;
                        changed += 1;
                    }
                }
            }

            match self.schema.role(col) {
                ColumnRole::Base {
                    unit: Some(unit), ..
                } if field.data_type == DataType::Date => {
                    for row in &mut rows {
                        if row[col].is_empty() {
                            continue;
                        }
                        if let Some(granularity) = DateGranularity::from_unit(&row[unit])
                            && granularity.truncates()
                        {
                            let truncated = truncate_date(&row[col], granularity);
                            if truncated != row[col] {
                                row[col] = truncated;
                                changed += 1;
                            }
                        }
                    }
                }
                ColumnRole::Base { unit, bin: Some(bin) } => {
                    let labels = self.bin_labels(bin);
                    for row in &mut rows {
                        if row[col].trim().is_empty() {
                            continue;
                        }
                        let unit_value = unit.map(|unit| row[unit].as_str());
                        row[bin] = select_bin(&row[col], unit_value, labels);
                        changed += 1;
                    }
                }
                _ => {}
            }

            if changed > 0 {
                debug!(column = col, field = %field.name, changed, "derived column");
            }
        }

        info!(rows = rows.len(), columns = width, "derived imported rows");
        rows
    }

    fn unit_changed<G: GridView>(
        &self,
        grid: &G,
        row: usize,
        base: usize,
        unit: &str,
    ) -> Option<CellWrite> {
        match self.schema.role(base) {
            ColumnRole::Base { bin: Some(bin), .. } => {
                self.bin_write(row, grid.value_at(row, base), Some(unit), bin)
            }
            _ => {
                let base_field = self.schema.field(base)?;
                if base_field.data_type != DataType::Date {
                    return None;
                }
                let granularity = DateGranularity::from_unit(unit).filter(|g| g.truncates())?;
                let date = grid.value_at(row, base);
                if date.is_empty() {
                    return None;
                }
                Some(CellWrite::new(row, base, truncate_date(date, granularity)))
            }
        }
    }

    /// The companion value a base implies in `grid` as it stands.
    fn companion_write<G: GridView>(
        &self,
        grid: &G,
        row: usize,
        base: usize,
    ) -> Option<CellWrite> {
        match self.schema.role(base) {
            ColumnRole::Base {
                unit: Some(unit), ..
            } => self.unit_changed(grid, row, base, grid.value_at(row, unit)),
            ColumnRole::Base { unit: None, bin: Some(bin) } => {
                self.bin_write(row, grid.value_at(row, base), None, bin)
            }
            _ => None,
        }
    }

    fn bin_write(&self, row: usize, value: &str, unit: Option<&str>, bin: usize) -> Option<CellWrite> {
        if value.trim().is_empty() {
            return None;
        }
        Some(CellWrite::new(
            row,
            bin,
            select_bin(value, unit, self.bin_labels(bin)),
        ))
    }

    fn bin_labels(&self, bin: usize) -> &'a [String] {
        self.schema
            .field(bin)
            .map(|field| field.flat_vocabulary.as_slice())
            .unwrap_or_default()
    }
}

fn capitalize(field: &Field, value: String) -> String {
    if field.capitalize.is_none() || value.is_empty() {
        value
    } else {
        normalize_case(&value, field.capitalize)
    }
}

/// A grid with the staged writes of a batch layered on top.
struct PendingGrid<'g, G> {
    grid: &'g G,
    staged: HashMap<(usize, usize), String>,
}

impl<'g, G: GridView> PendingGrid<'g, G> {
    fn new(grid: &'g G) -> Self {
        Self {
            grid,
            staged: HashMap::new(),
        }
    }

    fn stage(&mut self, write: &CellWrite) {
        self.staged.insert((write.row, write.col), write.value.clone());
    }
}

impl<G: GridView> GridView for PendingGrid<'_, G> {
    fn value_at(&self, row: usize, col: usize) -> &str {
        match self.staged.get(&(row, col)) {
            Some(value) => value,
            None => self.grid.value_at(row, col),
        }
    }

    fn row_count(&self) -> usize {
        let staged = self.staged.keys().map(|(row, _)| row + 1).max().unwrap_or(0);
        self.grid.row_count().max(staged)
    }

    fn is_row_empty(&self, row: usize) -> bool {
        let staged_blank = self
            .staged
            .iter()
            .filter(|((r, _), _)| *r == row)
            .all(|(_, value)| value.trim().is_empty());
        staged_blank && self.grid.is_row_empty(row)
    }
}
