//! Schema loading and compilation.
//!
//! [`compile`] turns a loaded [`harmonizer_model::Schema`] into a
//! [`CompiledSchema`]: flat vocabularies, the field-name lookup and the
//! companion-field role index consumed by the rule engine, validator and
//! header mapper.

pub mod companions;
pub mod compile;
pub mod compiled;
pub mod error;
pub mod loaders;
pub mod manifest;

pub use companions::{BIN_SUFFIX, ColumnRole, UNIT_SUFFIX};
pub use compile::{compile, flatten_vocabulary};
pub use compiled::{CompiledSchema, SectionSpan};
pub use error::{Result, SchemaError};
pub use loaders::{load_schema, load_schema_json, load_schema_tsv, parse_vocabulary_sheet};
pub use manifest::{
    MANIFEST_FILE, TEMPLATES_ENV_VAR, TemplateEntry, TemplateManifest, TemplateStatus,
    default_templates_root,
};
