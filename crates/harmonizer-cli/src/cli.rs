//! CLI argument definitions for the harmonizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use harmonizer_validate::RowFilter;

#[derive(Parser)]
#[command(
    name = "harmonizer",
    version,
    about = "Harmonize sample sheets against a data template",
    long_about = "Import, normalize and validate CSV/TSV sample sheets against a\n\
                  template schema.\n\n\
                  Templates come from the catalog (templates.toml) or from a schema\n\
                  file (.json, or a .tsv vocabulary sheet)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Template catalog directory (default: $HARMONIZER_TEMPLATES_DIR, then
    /// the bundled templates/).
    #[arg(long = "templates-dir", value_name = "DIR", global = true)]
    pub templates_dir: Option<PathBuf>,

    /// Version recorded in provenance cells (default: the harmonizer version).
    #[arg(long = "provenance-version", value_name = "VERSION", global = true)]
    pub provenance_version: Option<String>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the templates in the catalog.
    Templates(TemplatesArgs),

    /// Show the fields of a template.
    Fields(FieldsArgs),

    /// Build a JSON schema from a tab-separated vocabulary sheet.
    BuildSchema(BuildSchemaArgs),

    /// Import a sheet into template column order and write the normalized export.
    Import(ImportArgs),

    /// Import a sheet and validate every cell against the template.
    Validate(ValidateArgs),

    /// Import a sheet and rewrite it into an external format's columns.
    Export(ExportArgs),
}

#[derive(Parser)]
pub struct TemplatesArgs {
    /// Include draft templates.
    #[arg(long = "drafts")]
    pub drafts: bool,
}

#[derive(Parser)]
pub struct FieldsArgs {
    /// Schema file (.json/.tsv) or catalog template label/folder.
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// Only list required fields.
    #[arg(long = "required")]
    pub required: bool,

    /// Print the reference text of one field instead of the table.
    #[arg(long = "describe", value_name = "FIELD")]
    pub describe: Option<String>,
}

#[derive(Parser)]
pub struct BuildSchemaArgs {
    /// Tab-separated vocabulary sheet.
    #[arg(value_name = "TSV")]
    pub sheet: PathBuf,

    /// Where to write the JSON schema.
    #[arg(long = "output", short = 'o', value_name = "JSON")]
    pub output: PathBuf,
}

#[derive(Parser)]
pub struct ImportArgs {
    /// Schema file (.json/.tsv) or catalog template label/folder.
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// CSV or TSV sheet to import.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Export file; CSV or TSV by extension.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// One-based row holding the column names, when the sheet does not
    /// start with the template headers.
    #[arg(long = "header-row", value_name = "N")]
    pub header_row: Option<usize>,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Schema file (.json/.tsv) or catalog template label/folder.
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// CSV or TSV sheet to validate.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// One-based row holding the column names, when the sheet does not
    /// start with the template headers.
    #[arg(long = "header-row", value_name = "N")]
    pub header_row: Option<usize>,

    /// Write the JSON validation report.
    #[arg(long = "report", value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Write the validated sheet, provenance stamped, to this file.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Rows to list after validation (all, valid, invalid).
    #[arg(long = "rows", value_name = "FILTER", default_value = "all")]
    pub rows: RowFilter,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Schema file (.json/.tsv) or catalog template label/folder.
    #[arg(value_name = "SCHEMA")]
    pub schema: String,

    /// CSV or TSV sheet to export.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Export format prefix, as in the `EXPORT_<prefix>` sheet columns.
    #[arg(long = "format", short = 'f', value_name = "PREFIX")]
    pub format: String,

    /// Export file; CSV or TSV by extension.
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: PathBuf,

    /// One-based row holding the column names, when the sheet does not
    /// start with the template headers.
    #[arg(long = "header-row", value_name = "N")]
    pub header_row: Option<usize>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
