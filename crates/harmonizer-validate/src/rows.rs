use std::fmt;
use std::str::FromStr;

use harmonizer_model::{GridView, InvalidCells};

/// Which rows to show after a validation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowFilter {
    #[default]
    All,
    /// Rows without invalid cells; empty rows are hidden.
    Valid,
    /// Rows with at least one invalid cell.
    Invalid,
}

impl FromStr for RowFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(RowFilter::All),
            "valid" => Ok(RowFilter::Valid),
            "invalid" => Ok(RowFilter::Invalid),
            other => Err(format!("unknown row filter: {other} (expected all, valid or invalid)")),
        }
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RowFilter::All => "all",
            RowFilter::Valid => "valid",
            RowFilter::Invalid => "invalid",
        };
        write!(f, "{label}")
    }
}

/// Indices of the rows visible under `filter`.
pub fn visible_rows<G: GridView>(grid: &G, invalid: &InvalidCells, filter: RowFilter) -> Vec<usize> {
    (0..grid.row_count())
        .filter(|&row| match filter {
            RowFilter::All => true,
            RowFilter::Valid => !invalid.contains_row(row) && !grid.is_row_empty(row),
            RowFilter::Invalid => invalid.contains_row(row) && !grid.is_row_empty(row),
        })
        .collect()
}
