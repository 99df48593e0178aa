//! Column remapping onto the canonical field order.

use harmonizer_model::{HeaderRows, Matrix};
use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::MappingError;
use crate::header::{detect_header_row, is_valid_header_row};

/// Minimum Jaro-Winkler similarity for a header suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.85;

/// Remapped matrix: both canonical header rows followed by the data rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemappedMatrix {
    pub matrix: Matrix,
    /// Canonical field names without an exact match, in canonical order.
    pub unmapped_headers: Vec<String>,
}

impl RemappedMatrix {
    pub fn data_rows(&self) -> &[Vec<String>] {
        self.matrix.get(2..).unwrap_or_default()
    }

    pub fn into_data_rows(mut self) -> Matrix {
        if self.matrix.len() <= 2 {
            return Vec::new();
        }
        self.matrix.split_off(2)
    }
}

/// Closest import header for an unmapped canonical header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderSuggestion {
    pub expected: String,
    pub found: String,
    pub similarity: f64,
}

/// Remap data rows below the zero-based `header_row_index` onto the canonical
/// columns by exact header name. Missing columns are blank; extra import
/// columns are dropped.
pub fn remap(matrix: &[Vec<String>], header_row_index: usize, headers: &HeaderRows) -> RemappedMatrix {
    let actual = matrix.get(header_row_index).map(Vec::as_slice).unwrap_or_default();

    let mut unmapped_headers = Vec::new();
    let sources: Vec<Option<usize>> = headers
        .secondary
        .iter()
        .map(|expected| {
            let source = actual.iter().position(|found| found == expected);
            if source.is_none() {
                unmapped_headers.push(expected.clone());
            }
            source
        })
        .collect();

    let mut out = headers.to_matrix();
    for row in matrix.iter().skip(header_row_index + 1) {
        out.push(
            sources
                .iter()
                .map(|source| {
                    source
                        .and_then(|idx| row.get(idx))
                        .cloned()
                        .unwrap_or_default()
                })
                .collect(),
        );
    }

    if !unmapped_headers.is_empty() {
        warn!(
            count = unmapped_headers.len(),
            headers = ?unmapped_headers,
            "template columns missing from import"
        );
    }

    RemappedMatrix {
        matrix: out,
        unmapped_headers,
    }
}

/// For each unmapped header, the most similar header of the import row that
/// is not already used by an exact match. Informational only.
pub fn suggest_headers(
    unmapped: &[String],
    import_headers: &[String],
    canonical: &[String],
) -> Vec<HeaderSuggestion> {
    let free: Vec<&String> = import_headers
        .iter()
        .filter(|found| !found.trim().is_empty() && !canonical.contains(found))
        .collect();

    unmapped
        .iter()
        .filter_map(|expected| {
            let expected_norm = expected.trim().to_lowercase();
            free.iter()
                .map(|found| {
                    let similarity =
                        jaro_similarity(expected_norm.chars(), found.trim().to_lowercase().chars());
                    (found, similarity)
                })
                .filter(|(_, similarity)| *similarity >= SUGGESTION_THRESHOLD)
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(found, similarity)| HeaderSuggestion {
                    expected: expected.clone(),
                    found: (*found).clone(),
                    similarity,
                })
        })
        .collect()
}

/// Outcome of preparing an imported matrix for the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportMapping {
    /// One-based header row that was used.
    pub header_row: usize,
    /// Data rows in canonical column order.
    pub rows: Matrix,
    pub unmapped_headers: Vec<String>,
    pub suggestions: Vec<HeaderSuggestion>,
}

/// Locate the header row and bring the data into canonical column order.
///
/// An exact canonical header in row 1 or 2 takes the data below it as is.
/// Otherwise `manual_header_row` (one-based) is required and the columns are
/// remapped by name.
pub fn map_import(
    matrix: &[Vec<String>],
    headers: &HeaderRows,
    manual_header_row: Option<usize>,
) -> Result<ImportMapping, MappingError> {
    if let Some(header_row) = detect_header_row(matrix, &headers.secondary) {
        info!(header_row, "import headers match the template");
        return Ok(ImportMapping {
            header_row,
            rows: matrix[header_row..].to_vec(),
            unmapped_headers: Vec::new(),
            suggestions: Vec::new(),
        });
    }

    let header_row = manual_header_row.ok_or(MappingError::NeedsHeaderRow)?;
    if !is_valid_header_row(matrix, header_row) {
        return Err(MappingError::InvalidHeaderRow {
            input: header_row.to_string(),
            rows: matrix.len(),
        });
    }

    let remapped = remap(matrix, header_row - 1, headers);
    let suggestions = suggest_headers(
        &remapped.unmapped_headers,
        &matrix[header_row - 1],
        &headers.secondary,
    );
    info!(
        header_row,
        unmapped = remapped.unmapped_headers.len(),
        "remapped import columns"
    );
    let unmapped_headers = remapped.unmapped_headers.clone();
    Ok(ImportMapping {
        header_row,
        rows: remapped.into_data_rows(),
        unmapped_headers,
        suggestions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    fn headers() -> HeaderRows {
        HeaderRows {
            primary: strings(&["Sample", "", ""]),
            secondary: strings(&["a", "b", "c"]),
        }
    }

    #[test]
    fn reversed_columns_with_one_missing() {
        let matrix = vec![strings(&["c", "a"]), strings(&["3", "1"]), strings(&["6", "4"])];
        let remapped = remap(&matrix, 0, &headers());
        assert_eq!(remapped.unmapped_headers, vec!["b"]);
        assert_eq!(
            remapped.matrix,
            vec![
                strings(&["Sample", "", ""]),
                strings(&["a", "b", "c"]),
                strings(&["1", "", "3"]),
                strings(&["4", "", "6"]),
            ]
        );
    }

    #[test]
    fn extra_and_short_rows() {
        let matrix = vec![
            strings(&["notes", "a", "b", "c"]),
            strings(&["x", "1"]),
        ];
        let remapped = remap(&matrix, 0, &headers());
        assert!(remapped.unmapped_headers.is_empty());
        assert_eq!(remapped.data_rows(), &[strings(&["1", "", ""])]);
    }

    #[test]
    fn suggests_close_headers_only() {
        let suggestions = suggest_headers(
            &strings(&["host age", "sample id"]),
            &strings(&["Host Age ", "collector", "a"]),
            &strings(&["a", "host age", "sample id"]),
        );
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].expected, "host age");
        assert_eq!(suggestions[0].found, "Host Age ");
        assert!((suggestions[0].similarity - 1.0).abs() < f64::EPSILON);
    }
}
