//! Cell and grid validation.
//!
//! [`validate_cell`] classifies one value against its field. [`GridValidator`]
//! runs it over every non-empty row, stamps provenance cells and builds the
//! sparse [`harmonizer_model::InvalidCells`] map.

pub mod cell;
pub mod grid;
pub mod issue;
pub mod provenance;
pub mod report;
pub mod rows;

pub use cell::{CellVerdict, is_strict_date, matches_any, normalize_selections, validate_cell};
pub use grid::{GridValidator, ValidationPass};
pub use issue::{CellIssue, REQUIRED_EMPTY_MESSAGE};
pub use provenance::{PROVENANCE_PREFIX, provenance_tag, stamp_provenance};
pub use report::{FieldSummary, ValidationReport};
pub use rows::{RowFilter, visible_rows};
