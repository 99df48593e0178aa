use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use harmonizer_schema::{ColumnRole, CompiledSchema, TemplateEntry, TemplateStatus};

use crate::types::{BuildSchemaResult, ExportResult, ImportResult, ValidateResult};

pub fn templates_table(templates: &[&TemplateEntry]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Template"),
        header_cell("Folder"),
        header_cell("Status"),
        header_cell("Schema"),
    ]);
    apply_table_style(&mut table);
    for template in templates {
        let status = match template.status {
            TemplateStatus::Published => Cell::new("published").fg(Color::Green),
            TemplateStatus::Draft => Cell::new("draft").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&template.label)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(&template.folder),
            status,
            dim_cell(template.schema_file()),
        ]);
    }
    table
}

pub fn fields_table(schema: &CompiledSchema, columns: &[usize]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Section"),
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Required"),
        header_cell("Terms"),
        header_cell("Companion"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for &col in columns {
        let Some(field) = schema.field(col) else {
            continue;
        };
        let section = schema
            .sections()
            .iter()
            .find(|span| span.columns().contains(&col))
            .map(|span| span.name.as_str())
            .unwrap_or_default();
        let requirement = field.value_required.as_str();
        let required = if requirement.is_empty() {
            dim_cell("-")
        } else if field.is_required() {
            Cell::new(requirement).fg(Color::Red)
        } else {
            Cell::new(requirement).fg(Color::Yellow)
        };
        let terms = if field.data_type.has_vocabulary() {
            Cell::new(field.flat_vocabulary.len())
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            Cell::new(col + 1),
            Cell::new(section),
            Cell::new(&field.name).add_attribute(Attribute::Bold),
            Cell::new(field.data_type.as_str()),
            required,
            terms,
            role_cell(schema, schema.role(col)),
        ]);
    }
    table
}

pub fn print_build_summary(result: &BuildSchemaResult) {
    println!(
        "Schema: {} ({} sections, {} fields)",
        result.output.display(),
        result.sections,
        result.fields
    );
}

pub fn print_import_summary(result: &ImportResult) {
    println!("Header row: {}", result.header_row);
    println!("Rows: {}", result.rows);
    if let Some(path) = &result.output {
        println!("Output: {}", path.display());
    }
    if result.unmapped_headers.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Missing column"),
        header_cell("Closest import header"),
        header_cell("Similarity"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for expected in &result.unmapped_headers {
        let suggestion = result
            .suggestions
            .iter()
            .find(|suggestion| &suggestion.expected == expected);
        let (found, similarity) = match suggestion {
            Some(s) => (
                Cell::new(&s.found).fg(Color::Yellow),
                Cell::new(format!("{:.2}", s.similarity)),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![Cell::new(expected).fg(Color::Red), found, similarity]);
    }
    println!("{table}");
}

pub fn print_validation_summary(result: &ValidateResult) {
    print_import_summary(&result.import);
    let report = &result.report;
    println!("Provenance version: {}", report.version);
    if let Some(path) = &result.report_path {
        println!("Report: {}", path.display());
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Column"),
        header_cell("Invalid"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for summary in &report.fields {
        table.add_row(vec![
            Cell::new(&summary.field),
            Cell::new(summary.column + 1),
            count_cell(Some(summary.invalid), Color::Red),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        count_cell(Some(report.invalid_cells), Color::Red).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    println!(
        "Rows checked: {}, invalid rows: {}",
        report.rows_checked, report.invalid_rows
    );

    if result.rows.is_empty() {
        return;
    }
    let mut rows = Table::new();
    rows.set_header(vec![
        header_cell("Row"),
        header_cell("Sample"),
        header_cell(&format!("Issues ({} rows)", result.filter)),
    ]);
    apply_table_style(&mut rows);
    align_column(&mut rows, 0, CellAlignment::Right);
    for status in &result.rows {
        let issues = if status.issues.is_empty() {
            Cell::new("ok").fg(Color::Green)
        } else {
            Cell::new(status.issues.join("\n")).fg(Color::Red)
        };
        rows.add_row(vec![
            Cell::new(status.row + 1),
            Cell::new(&status.label),
            issues,
        ]);
    }
    println!("{rows}");
}

pub fn print_export_summary(result: &ExportResult) {
    print_import_summary(&result.import);
    println!(
        "Export: {} ({} format, {} columns)",
        result.output.display(),
        result.format,
        result.columns.len()
    );
}

fn role_cell(schema: &CompiledSchema, role: ColumnRole) -> Cell {
    let name = |col: usize| {
        schema
            .field(col)
            .map(|field| field.name.clone())
            .unwrap_or_default()
    };
    match role {
        ColumnRole::Plain => dim_cell("-"),
        ColumnRole::Base { unit, bin } => {
            let companions: Vec<&str> = [unit.map(|_| "unit"), bin.map(|_| "bin")]
                .into_iter()
                .flatten()
                .collect();
            Cell::new(format!("base ({})", companions.join(", "))).fg(Color::Blue)
        }
        ColumnRole::Unit { base } => dim_cell(format!("unit of {}", name(base))),
        ColumnRole::Bin { base } => dim_cell(format!("bin of {}", name(base))),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: Option<usize>, color: Color) -> Cell {
    match count {
        Some(value) if value > 0 => Cell::new(value).fg(color).add_attribute(Attribute::Bold),
        Some(value) => dim_cell(value),
        None => dim_cell("-"),
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
