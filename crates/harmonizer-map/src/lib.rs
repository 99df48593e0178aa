//! Reconciles imported matrices with the canonical template columns.
//!
//! An import is accepted as is when its first or second row equals the
//! canonical field-name row. Otherwise the user names the header row and the
//! data columns are remapped by exact header name; template columns with no
//! match stay blank and are reported, with fuzzy suggestions for the likely
//! misspellings.
//!
//! [`export_rows`] goes the other way: grid rows out to an external format's
//! columns through the schema's `exportField` rewrites.

pub mod error;
pub mod export;
pub mod header;
pub mod remap;

pub use error::MappingError;
pub use export::{ExportTable, export_formats, export_rows};
pub use header::{detect_header_row, is_valid_header_row, parse_header_row};
pub use remap::{HeaderSuggestion, ImportMapping, RemappedMatrix, map_import, remap, suggest_headers};
