//! Schema loaders: template JSON and tabular vocabulary sheets.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use csv::ReaderBuilder;
use harmonizer_model::{
    CaseMode, DataType, ExportFields, ExportTransform, Field, Schema, Section, ValueRequirement,
    Vocabulary,
};
use tracing::{debug, info};

use crate::error::{Result, SchemaError};

/// Identifier marking the directive row that follows the sheet header.
const DIRECTIVE_ROW_ID: &str = "ID";

/// Sheet columns named `EXPORT_<prefix>` hold export rewrites.
const EXPORT_COLUMN_PREFIX: &str = "EXPORT_";

/// Load a schema from a `.json` template file or a `.tsv` vocabulary sheet.
pub fn load_schema(path: &Path) -> Result<Schema> {
    let is_sheet = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("tsv"));
    if is_sheet {
        load_schema_tsv(path)
    } else {
        load_schema_json(path)
    }
}

pub fn load_schema_json(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let schema: Schema = serde_json::from_str(&text).map_err(|source| SchemaError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), fields = schema.field_count(), "loaded schema");
    Ok(schema)
}

/// Build a schema from a tab-separated vocabulary sheet.
///
/// Rows are sections (empty `parent class`), fields (parent is a section),
/// top-level terms (parent is a field) or nested terms (parent is a term of
/// the most recently referenced field). Unresolvable rows are collected and
/// reported together.
pub fn load_schema_tsv(path: &Path) -> Result<Schema> {
    let text = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    let schema = parse_vocabulary_sheet(&text, path)?;
    info!(path = %path.display(), fields = schema.field_count(), "built schema from sheet");
    Ok(schema)
}

fn read_sheet_rows(text: &str, path: &Path) -> Result<Vec<BTreeMap<String, String>>> {
    let sheet_error = |message: String| SchemaError::Sheet {
        path: path.to_path_buf(),
        message,
    };
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .from_reader(text.as_bytes());
    let headers = reader
        .headers()
        .map_err(|e| sheet_error(format!("read headers: {e}")))?
        .clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| sheet_error(format!("read record: {e}")))?;
        let mut row = BTreeMap::new();
        for (idx, value) in record.iter().enumerate() {
            let key = headers
                .get(idx)
                .unwrap_or("")
                .trim_matches('\u{feff}')
                .trim()
                .to_string();
            row.insert(key, value.to_string());
        }
        rows.push(row);
    }
    Ok(rows)
}

fn cell<'a>(row: &'a BTreeMap<String, String>, key: &str) -> &'a str {
    row.get(key).map_or("", String::as_str)
}

fn parse_bound(raw: &str) -> std::result::Result<Option<f64>, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| format!("invalid bound {trimmed:?}"))
}

/// Read the `EXPORT_<prefix>` cells of a row.
///
/// Items are separated by `;`. `target:value` sends `value` to the `target`
/// column (`target:` clears it). A bare item names a target column on field
/// rows and a replacement value on term rows.
fn parse_exports(row: &BTreeMap<String, String>, on_field: bool) -> ExportFields {
    let mut formats = ExportFields::new();
    for (key, raw) in row {
        let Some(prefix) = key.strip_prefix(EXPORT_COLUMN_PREFIX) else {
            continue;
        };
        if prefix.is_empty() {
            continue;
        }
        let transforms: Vec<ExportTransform> = raw
            .split(';')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(|item| match item.split_once(':') {
                Some((target, value)) => {
                    let target = target.trim();
                    ExportTransform {
                        field: (!target.is_empty()).then(|| target.to_string()),
                        value: Some(value.trim().to_string()),
                    }
                }
                None if on_field => ExportTransform::to_field(item),
                None => ExportTransform::to_value(item),
            })
            .collect();
        if !transforms.is_empty() {
            formats.insert(prefix.to_string(), transforms);
        }
    }
    formats
}

fn parse_field(row: &BTreeMap<String, String>, label: &str) -> std::result::Result<Field, String> {
    let data_type = DataType::from_label(cell(row, "dataType"));
    let value_required: ValueRequirement = cell(row, "valueRequired")
        .parse()
        .map_err(|e| format!("{label}: {e}"))?;
    let capitalize: CaseMode = cell(row, "capitalize")
        .parse()
        .map_err(|e| format!("{label}: {e}"))?;
    let status = cell(row, "statusEnumeration");
    let status_enumeration = if status.is_empty() {
        Vec::new()
    } else {
        status.split(';').map(|s| s.trim().to_string()).collect()
    };
    let based_on = cell(row, "isBasedOn").trim();

    Ok(Field {
        identifier: cell(row, "identifier").trim().to_string(),
        name: label.to_string(),
        data_type,
        value_required,
        capitalize,
        vocabulary: data_type.has_vocabulary().then(Vocabulary::new),
        flat_vocabulary: Vec::new(),
        is_based_on: (!based_on.is_empty()).then(|| based_on.to_string()),
        status_enumeration,
        min_value: parse_bound(cell(row, "minValue")).map_err(|e| format!("{label}: {e}"))?,
        max_value: parse_bound(cell(row, "maxValue")).map_err(|e| format!("{label}: {e}"))?,
        description: cell(row, "description").to_string(),
        guidance: cell(row, "guidance").to_string(),
        examples: cell(row, "examples").to_string(),
        export_field: parse_exports(row, true),
    })
}

/// Parse sheet text. `path` is only used in error messages.
pub fn parse_vocabulary_sheet(text: &str, path: &Path) -> Result<Schema> {
    let rows = read_sheet_rows(text, path)?;
    let mut sections: Vec<Section> = Vec::new();
    // lowercase field name -> (section, field)
    let mut field_index: HashMap<String, (usize, usize)> = HashMap::new();
    let mut search_root: Option<(usize, usize)> = None;
    let mut errors = Vec::new();

    for (line, row) in rows.iter().enumerate() {
        if cell(row, "identifier") == DIRECTIVE_ROW_ID {
            continue;
        }
        let label = cell(row, "name").trim();
        if label.is_empty() {
            continue;
        }
        let parent = cell(row, "parent class").trim();
        // header is line 1
        let line = line + 2;

        if parent.is_empty() {
            sections.push(Section::new(label));
            continue;
        }

        if let Some(section_idx) = sections.iter().position(|s| s.name.trim() == parent) {
            match parse_field(row, label) {
                Ok(field) => {
                    let section = &mut sections[section_idx];
                    field_index.insert(label.to_lowercase(), (section_idx, section.fields.len()));
                    section.fields.push(field);
                }
                Err(message) => errors.push(format!("line {line}: {message}")),
            }
            continue;
        }

        if let Some(&(s, f)) = field_index.get(&parent.to_lowercase()) {
            search_root = Some((s, f));
            match sections[s].fields[f].vocabulary.as_mut() {
                Some(vocabulary) => {
                    vocabulary.insert(label).export_field = parse_exports(row, false);
                }
                None => errors.push(format!(
                    "line {line}: field {parent:?} is not a select or multiple field but has term {label:?}"
                )),
            }
            continue;
        }

        let term = search_root
            .and_then(|(s, f)| sections[s].fields[f].vocabulary.as_mut())
            .and_then(|vocabulary| vocabulary.find_mut(parent));
        match term {
            Some(term) => {
                term.children_mut().insert(label).export_field = parse_exports(row, false);
            }
            None => errors.push(format!(
                "line {line}: parent class {parent:?} is not a section, field or term (term {label:?})"
            )),
        }
    }

    if !errors.is_empty() {
        return Err(SchemaError::SheetRows {
            path: path.to_path_buf(),
            errors,
        });
    }
    debug!(sections = sections.len(), "parsed vocabulary sheet");
    Ok(Schema::new(sections))
}
