//! Template catalog (`templates.toml`).
//!
//! ```toml
//! [[template]]
//! label = "CanCOGeN Covid-19"
//! folder = "canada_covid19"
//! status = "published"
//!
//! [[template]]
//! label = "Wastewater"
//! folder = "wastewater"
//! status = "draft"
//! schema = "data.tsv"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};

/// Environment variable overriding the templates directory.
pub const TEMPLATES_ENV_VAR: &str = "HARMONIZER_TEMPLATES_DIR";

pub const MANIFEST_FILE: &str = "templates.toml";

const DEFAULT_SCHEMA_FILE: &str = "schema.json";

/// Templates root: the `HARMONIZER_TEMPLATES_DIR` environment variable, else
/// `templates/` at the workspace root.
pub fn default_templates_root() -> PathBuf {
    if let Ok(root) = std::env::var(TEMPLATES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../templates")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    Published,
    Draft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateEntry {
    pub label: String,
    pub folder: String,
    pub status: TemplateStatus,
    #[serde(default)]
    pub schema: Option<String>,
}

impl TemplateEntry {
    pub fn schema_file(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA_FILE)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateManifest {
    #[serde(rename = "template", default)]
    pub templates: Vec<TemplateEntry>,
}

impl TemplateManifest {
    /// Load `templates.toml` from a file, or from a directory containing it.
    pub fn load(path: &Path) -> Result<Self> {
        let path = if path.is_dir() {
            path.join(MANIFEST_FILE)
        } else {
            path.to_path_buf()
        };
        let text = std::fs::read_to_string(&path).map_err(|e| SchemaError::io(&path, e))?;
        toml::from_str(&text).map_err(|source| SchemaError::Toml { path, source })
    }

    /// Catalog entries, drafts only when asked for.
    pub fn templates(&self, include_drafts: bool) -> impl Iterator<Item = &TemplateEntry> {
        self.templates
            .iter()
            .filter(move |t| include_drafts || t.status == TemplateStatus::Published)
    }

    /// Find a template by label or folder name.
    pub fn find(&self, name: &str) -> Result<&TemplateEntry> {
        self.templates
            .iter()
            .find(|t| t.label == name || t.folder == name)
            .ok_or_else(|| SchemaError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    pub fn schema_path(root: &Path, template: &TemplateEntry) -> PathBuf {
        root.join(&template.folder).join(template.schema_file())
    }
}
