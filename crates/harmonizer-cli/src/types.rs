use std::path::PathBuf;

use harmonizer_map::HeaderSuggestion;
use harmonizer_validate::{RowFilter, ValidationReport};

#[derive(Debug)]
pub struct BuildSchemaResult {
    pub output: PathBuf,
    pub sections: usize,
    pub fields: usize,
}

/// What an import did to the sheet.
#[derive(Debug)]
pub struct ImportResult {
    /// One-based header row used to read the sheet.
    pub header_row: usize,
    pub rows: usize,
    pub unmapped_headers: Vec<String>,
    pub suggestions: Vec<HeaderSuggestion>,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct RowStatus {
    /// Zero-based data row.
    pub row: usize,
    pub label: String,
    /// `field: reason` for each invalid cell, in column order.
    pub issues: Vec<String>,
}

#[derive(Debug)]
pub struct ValidateResult {
    pub import: ImportResult,
    pub report: ValidationReport,
    pub filter: RowFilter,
    pub rows: Vec<RowStatus>,
    pub report_path: Option<PathBuf>,
}

impl ValidateResult {
    pub fn has_errors(&self) -> bool {
        !self.report.is_valid()
    }
}

#[derive(Debug)]
pub struct ExportResult {
    pub import: ImportResult,
    pub format: String,
    /// Export column names, in output order.
    pub columns: Vec<String>,
    pub output: PathBuf,
}
