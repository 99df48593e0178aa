//! Core types shared by every harmonizer crate: the field schema, data types,
//! case modes, grid access traits and the invalid-cell map.

pub mod case;
pub mod data_type;
pub mod error;
pub mod grid;
pub mod invalid;
pub mod schema;

pub use case::{CaseMode, normalize_case};
pub use data_type::{DataType, ValueRequirement};
pub use error::{ModelError, Result};
pub use grid::{CellWrite, Grid, GridMut, GridView, HeaderRows, Matrix};
pub use invalid::InvalidCells;
pub use schema::{
    ExportFields, ExportTransform, Field, Schema, Section, Vocabulary, VocabularyTerm,
};
