use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("unknown capitalize mode: {0:?} (expected UPPER, lower, Title or empty)")]
    UnknownCaseMode(String),
    #[error("unknown value requirement: {0:?} (expected required, recommended or empty)")]
    UnknownRequirement(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
