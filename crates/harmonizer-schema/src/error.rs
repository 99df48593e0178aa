use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse schema JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse vocabulary sheet {path}: {message}")]
    Sheet { path: PathBuf, message: String },

    #[error("vocabulary sheet {path} has {} unresolved rows:\n{}", .errors.len(), .errors.join("\n"))]
    SheetRows { path: PathBuf, errors: Vec<String> },

    #[error("duplicate field name: {name}")]
    DuplicateField { name: String },

    #[error("field {field:?} is based on unknown field {target:?}")]
    UnknownBasedOn { field: String, target: String },

    #[error("bin field {field:?} has no vocabulary")]
    BinWithoutVocabulary { field: String },

    #[error("companion field {field:?} is not adjacent to its base field {base:?}")]
    DetachedCompanion { field: String, base: String },

    #[error("unknown template: {name}")]
    UnknownTemplate { name: String },
}

impl SchemaError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SchemaError>;
