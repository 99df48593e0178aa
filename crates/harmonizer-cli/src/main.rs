//! Sample sheet harmonizer CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use harmonizer_cli::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use harmonizer_cli::commands::{
    run_build_schema, run_export, run_fields, run_import, run_templates, run_validate,
    templates_root,
};
use harmonizer_cli::logging::{LogConfig, LogFormat, init_logging};
use harmonizer_cli::summary::{
    print_build_summary, print_export_summary, print_import_summary, print_validation_summary,
};
use tracing::level_filters::LevelFilter;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let root = templates_root(cli.templates_dir.as_deref());
    let exit_code = match &cli.command {
        Command::Templates(args) => exit_status(run_templates(args, &root)),
        Command::Fields(args) => exit_status(run_fields(args, &root)),
        Command::BuildSchema(args) => match run_build_schema(args) {
            Ok(result) => {
                print_build_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Import(args) => match run_import(args, &root) {
            Ok(result) => {
                print_import_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
        Command::Validate(args) => {
            match run_validate(args, &root, cli.provenance_version.as_deref()) {
                Ok(result) => {
                    print_validation_summary(&result);
                    if result.has_errors() { 1 } else { 0 }
                }
                Err(error) => report_error(&error),
            }
        }
        Command::Export(args) => match run_export(args, &root) {
            Ok(result) => {
                print_export_summary(&result);
                0
            }
            Err(error) => report_error(&error),
        },
    };
    std::process::exit(exit_code);
}

fn exit_status(result: anyhow::Result<()>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(error) => report_error(&error),
    }
}

fn report_error(error: &anyhow::Error) -> i32 {
    eprintln!("error: {error:#}");
    1
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
