//! Delimited-text matrices.

use std::path::Path;

use csv::{ReaderBuilder, WriterBuilder};
use harmonizer_model::{Grid, HeaderRows, Matrix};
use tracing::info;

use crate::error::{IngestError, Result};

/// Delimited text formats the editor reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixFormat {
    Csv,
    Tsv,
}

impl MatrixFormat {
    /// Format from the file extension. Binary spreadsheets are rejected.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match extension.as_str() {
            "csv" => Ok(MatrixFormat::Csv),
            "tsv" | "tab" | "txt" => Ok(MatrixFormat::Tsv),
            _ => Err(IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }

    pub fn delimiter(&self) -> u8 {
        match self {
            MatrixFormat::Csv => b',',
            MatrixFormat::Tsv => b'\t',
        }
    }
}

fn normalize_cell(raw: &str) -> String {
    raw.trim_matches('\u{feff}').to_string()
}

/// Read every row of a CSV/TSV file. Rows may differ in length.
pub fn read_matrix(path: &Path) -> Result<Matrix> {
    let format = MatrixFormat::from_path(path)?;
    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        rows.push(record.iter().map(normalize_cell).collect());
    }
    info!(path = %path.display(), rows = rows.len(), "read matrix");
    Ok(rows)
}

/// Write a matrix as CSV or TSV, chosen by extension.
pub fn write_matrix(path: &Path, matrix: &[Vec<String>]) -> Result<()> {
    let format = MatrixFormat::from_path(path)?;
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter())
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    for row in matrix {
        writer
            .write_record(row)
            .map_err(|e| IngestError::csv(path, e))?;
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = matrix.len(), "wrote matrix");
    Ok(())
}

/// Export layout: both header rows, then the data rows without the trailing
/// empty rows.
pub fn export_matrix(headers: &HeaderRows, grid: &Grid) -> Matrix {
    let mut matrix = headers.to_matrix();
    matrix.extend(grid.trimmed_rows().iter().cloned());
    matrix
}
