use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use harmonizer_ingest::{export_matrix, read_matrix, write_matrix};
use harmonizer_map::{ImportMapping, export_rows, map_import};
use harmonizer_model::{Grid, GridView};
use harmonizer_rules::RuleEngine;
use harmonizer_schema::{
    CompiledSchema, TemplateManifest, compile, default_templates_root, load_schema,
    load_schema_tsv,
};
use harmonizer_validate::{GridValidator, ValidationReport, visible_rows};
use tracing::{info, info_span};

use crate::cli::{
    BuildSchemaArgs, ExportArgs, FieldsArgs, ImportArgs, TemplatesArgs, ValidateArgs,
};
use crate::summary::{fields_table, templates_table};
use crate::types::{BuildSchemaResult, ExportResult, ImportResult, RowStatus, ValidateResult};

/// Catalog root: the explicit directory, else the environment/bundled default.
pub fn templates_root(explicit: Option<&Path>) -> PathBuf {
    explicit.map_or_else(default_templates_root, Path::to_path_buf)
}

/// Load and compile a schema named by file path or catalog label/folder.
pub fn resolve_schema(source: &str, templates_root: &Path) -> Result<CompiledSchema> {
    let path = Path::new(source);
    let schema_path = if path.is_file() {
        path.to_path_buf()
    } else {
        let manifest = TemplateManifest::load(templates_root).with_context(|| {
            format!("load template catalog from {}", templates_root.display())
        })?;
        let template = manifest.find(source)?;
        TemplateManifest::schema_path(templates_root, template)
    };
    let schema = load_schema(&schema_path)
        .with_context(|| format!("load schema {}", schema_path.display()))?;
    compile(&schema).with_context(|| format!("compile schema {}", schema_path.display()))
}

pub fn run_templates(args: &TemplatesArgs, templates_root: &Path) -> Result<()> {
    let manifest = TemplateManifest::load(templates_root)
        .with_context(|| format!("load template catalog from {}", templates_root.display()))?;
    let templates: Vec<_> = manifest.templates(args.drafts).collect();
    println!("{}", templates_table(&templates));
    Ok(())
}

pub fn run_fields(args: &FieldsArgs, templates_root: &Path) -> Result<()> {
    let schema = resolve_schema(&args.schema, templates_root)?;
    if let Some(name) = &args.describe {
        let reference = schema
            .column_of(name)
            .and_then(|col| schema.field_reference(col))
            .with_context(|| format!("no field named {name:?} in {}", args.schema))?;
        print!("{reference}");
        return Ok(());
    }
    let columns: Vec<usize> = if args.required {
        schema.required_columns()
    } else {
        (0..schema.width()).collect()
    };
    println!("{}", fields_table(&schema, &columns));
    Ok(())
}

pub fn run_build_schema(args: &BuildSchemaArgs) -> Result<BuildSchemaResult> {
    let _span = info_span!("build_schema", sheet = %args.sheet.display()).entered();
    let schema = load_schema_tsv(&args.sheet)
        .with_context(|| format!("read vocabulary sheet {}", args.sheet.display()))?;
    let compiled = compile(&schema)
        .with_context(|| format!("compile schema from {}", args.sheet.display()))?;
    let json = serde_json::to_string_pretty(&compiled.to_schema()).context("serialize schema")?;
    std::fs::write(&args.output, json)
        .with_context(|| format!("write {}", args.output.display()))?;
    info!(output = %args.output.display(), fields = compiled.width(), "wrote schema");
    Ok(BuildSchemaResult {
        output: args.output.clone(),
        sections: compiled.sections().len(),
        fields: compiled.width(),
    })
}

pub fn run_import(args: &ImportArgs, templates_root: &Path) -> Result<ImportResult> {
    let _span = info_span!("import", input = %args.input.display()).entered();
    let schema = resolve_schema(&args.schema, templates_root)?;
    let (grid, mut result) = load_grid(&schema, &args.input, args.header_row)?;
    write_export(&schema, &grid, &args.output)?;
    result.output = Some(args.output.clone());
    Ok(result)
}

pub fn run_validate(
    args: &ValidateArgs,
    templates_root: &Path,
    provenance_version: Option<&str>,
) -> Result<ValidateResult> {
    let _span = info_span!("validate", input = %args.input.display()).entered();
    let schema = resolve_schema(&args.schema, templates_root)?;
    let (mut grid, mut import) = load_grid(&schema, &args.input, args.header_row)?;

    let mut validator = GridValidator::new(&schema);
    if let Some(version) = provenance_version {
        validator = validator.with_version(version);
    }
    let invalid = validator.validate_in_place(&mut grid);
    let rows_checked = (0..grid.row_count())
        .filter(|&row| !grid.is_row_empty(row))
        .count();
    let report = ValidationReport::new(&schema, &invalid, rows_checked, validator.version());

    if let Some(path) = &args.report {
        report
            .write_json(path)
            .with_context(|| format!("write report {}", path.display()))?;
        info!(path = %path.display(), "wrote validation report");
    }
    if let Some(path) = &args.output {
        write_export(&schema, &grid, path)?;
        import.output = Some(path.clone());
    }

    let data_rows = grid.trimmed_rows().len();
    let rows = visible_rows(&grid, &invalid, args.rows)
        .into_iter()
        .filter(|&row| row < data_rows)
        .map(|row| RowStatus {
            row,
            label: grid.value_at(row, 0).to_string(),
            issues: invalid
                .row(row)
                .map(|cells| {
                    cells
                        .iter()
                        .map(|(&col, reason)| {
                            let field = schema.field(col).map_or("?", |f| f.name.as_str());
                            format!("{field}: {reason}")
                        })
                        .collect()
                })
                .unwrap_or_default(),
        })
        .collect();

    Ok(ValidateResult {
        import,
        report,
        filter: args.rows,
        rows,
        report_path: args.report.clone(),
    })
}

pub fn run_export(args: &ExportArgs, templates_root: &Path) -> Result<ExportResult> {
    let _span =
        info_span!("export", input = %args.input.display(), format = %args.format).entered();
    let schema = resolve_schema(&args.schema, templates_root)?;
    let (grid, import) = load_grid(&schema, &args.input, args.header_row)?;
    let table = export_rows(schema.fields(), grid.trimmed_rows(), &args.format)
        .with_context(|| format!("export {} as {}", args.input.display(), args.format))?;
    write_matrix(&args.output, &table.to_matrix())
        .with_context(|| format!("write {}", args.output.display()))?;
    Ok(ExportResult {
        import,
        format: table.format,
        columns: table.headers,
        output: args.output.clone(),
    })
}

/// Read a sheet, bring it into template order and apply the derivation rules.
fn load_grid(
    schema: &CompiledSchema,
    input: &Path,
    header_row: Option<usize>,
) -> Result<(Grid, ImportResult)> {
    let matrix = read_matrix(input).with_context(|| format!("read {}", input.display()))?;
    let ImportMapping {
        header_row,
        rows,
        unmapped_headers,
        suggestions,
    } = map_import(&matrix, &schema.header_rows(), header_row)
        .with_context(|| format!("map the columns of {}", input.display()))?;
    let rows = RuleEngine::new(schema).derive_matrix(rows);
    let grid = Grid::from_rows(schema.width(), rows);
    let result = ImportResult {
        header_row,
        rows: grid.trimmed_rows().len(),
        unmapped_headers,
        suggestions,
        output: None,
    };
    Ok((grid, result))
}

fn write_export(schema: &CompiledSchema, grid: &Grid, path: &Path) -> Result<()> {
    let matrix = export_matrix(&schema.header_rows(), grid);
    write_matrix(path, &matrix).with_context(|| format!("write {}", path.display()))
}
