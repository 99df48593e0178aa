//! Numeric bin selection.

/// Unit value converted to years before binning in `[X][X unit][X bin]`.
pub const MONTH_UNIT: &str = "month";

const MONTHS_PER_YEAR: f64 = 12.0;

/// Parses the leading number of a bin label (`"10 - 19"` → 10, `"80+"` → 80).
///
/// Leading whitespace is skipped, so indented vocabulary entries still parse.
pub fn leading_number(label: &str) -> Option<f64> {
    let text = label.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        if fraction_end > fraction_start || has_digits {
            has_digits |= fraction_end > fraction_start;
            end = fraction_end;
        }
    }
    if !has_digits {
        return None;
    }
    text[..end].trim_end_matches('.').parse().ok()
}

/// Parses a base value for binning by its leading number, which must be
/// finite and non-negative (`"12 years"` → 12).
pub fn parse_base(value: &str) -> Option<f64> {
    leading_number(value).filter(|number| number.is_finite() && *number >= 0.0)
}

/// Select the bin label for `value`.
///
/// `unit` is only given for the three-field form; a `month` unit converts the
/// value to years. Labels are walked in order and the last one whose leading
/// number is `<=` the value wins; the walk stops at the first label that
/// exceeds it (or has no leading number). Returns `""` when nothing matches or
/// the value is not a non-negative number.
pub fn select_bin(value: &str, unit: Option<&str>, labels: &[String]) -> String {
    let Some(mut number) = parse_base(value) else {
        return String::new();
    };
    if unit == Some(MONTH_UNIT) {
        number /= MONTHS_PER_YEAR;
    }
    let mut selection = "";
    for label in labels {
        match leading_number(label) {
            Some(threshold) if number >= threshold => selection = label,
            _ => break,
        }
    }
    selection.to_string()
}
