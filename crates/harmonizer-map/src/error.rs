//! Error types for header mapping.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    /// Manual header row is not an integer in `1..=rows`.
    #[error("invalid header row {input:?}: enter a row number between 1 and {rows}")]
    InvalidHeaderRow { input: String, rows: usize },

    /// The canonical header row was not found and none was given.
    #[error("could not find the template header row; specify which row holds the column names")]
    NeedsHeaderRow,

    /// No field or term carries rewrites for the requested export format.
    #[error("unknown export format {format:?} (known: {})", known.join(", "))]
    UnknownExportFormat { format: String, known: Vec<String> },
}
