//! Spreadsheet boundary: CSV/TSV files to string matrices and back.

pub mod error;
pub mod matrix;

pub use error::{IngestError, Result};
pub use matrix::{MatrixFormat, export_matrix, read_matrix, write_matrix};
