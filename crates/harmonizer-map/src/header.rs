//! Header-row detection and manual header-row input.

use harmonizer_model::Matrix;

use crate::error::MappingError;

/// One-based row holding the canonical field names, if it is row 1 or 2.
///
/// Only an exact, full-row match counts.
pub fn detect_header_row(matrix: &[Vec<String>], secondary: &[String]) -> Option<usize> {
    matrix
        .iter()
        .take(2)
        .position(|row| row.as_slice() == secondary)
        .map(|index| index + 1)
}

/// True when `one_based` names an existing row.
pub fn is_valid_header_row(matrix: &[Vec<String>], one_based: usize) -> bool {
    one_based >= 1 && one_based <= matrix.len()
}

/// Parse a manually entered header row number.
pub fn parse_header_row(matrix: &Matrix, input: &str) -> Result<usize, MappingError> {
    let invalid = || MappingError::InvalidHeaderRow {
        input: input.to_string(),
        rows: matrix.len(),
    };
    let row = input.trim().parse::<usize>().map_err(|_| invalid())?;
    if is_valid_header_row(matrix, row) {
        Ok(row)
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn detects_first_or_second_row() {
        let secondary = strings(&["a", "b"]);
        let first = vec![strings(&["a", "b"]), strings(&["1", "2"])];
        let second = vec![strings(&["Section", ""]), strings(&["a", "b"])];
        let neither = vec![strings(&["b", "a"]), strings(&["a"]), strings(&["a", "b"])];
        assert_eq!(detect_header_row(&first, &secondary), Some(1));
        assert_eq!(detect_header_row(&second, &secondary), Some(2));
        assert_eq!(detect_header_row(&neither, &secondary), None);
        assert_eq!(detect_header_row(&[], &secondary), None);
    }

    #[test]
    fn header_row_input_must_be_in_range() {
        let matrix = vec![strings(&["a"]), strings(&["b"]), strings(&["c"])];
        assert_eq!(parse_header_row(&matrix, " 3 "), Ok(3));
        for bad in ["0", "4", "-1", "1.5", "two", ""] {
            assert!(
                matches!(
                    parse_header_row(&matrix, bad),
                    Err(MappingError::InvalidHeaderRow { rows: 3, .. })
                ),
                "{bad}"
            );
        }
    }
}
