use serde::Serialize;
use std::collections::BTreeMap;

/// Sparse map of invalid cells: row → (column → reason).
///
/// Rebuilt from scratch by every validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InvalidCells {
    rows: BTreeMap<usize, BTreeMap<usize, String>>,
}

impl InvalidCells {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, row: usize, col: usize, reason: impl Into<String>) {
        self.rows.entry(row).or_default().insert(col, reason.into());
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(&row)
            .and_then(|cells| cells.get(&col))
            .map(String::as_str)
    }

    pub fn row(&self, row: usize) -> Option<&BTreeMap<usize, String>> {
        self.rows.get(&row)
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.contains_key(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn cell_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }

    /// Every invalid cell as `(row, col, reason)` in row then column order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> {
        self.rows.iter().flat_map(|(row, cells)| {
            cells
                .iter()
                .map(move |(col, reason)| (*row, *col, reason.as_str()))
        })
    }
}
