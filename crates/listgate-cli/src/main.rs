// crates/listgate-cli/src/main.rs
// ============================================================================
// Module: Listgate CLI Entry Point
// Description: Command dispatcher for declarative endpoint contract suites.
// Purpose: List declared suites and run them with terminal progress output.
// Dependencies: clap, listgate-cli, listgate-core, listgate-report, serde_json.
// ============================================================================

//! ## Overview
//! The `listgate` binary loads a TOML suite-definitions file, resolves suite
//! names through the explicit registry, runs the selected suites in order,
//! and renders results as text, JSON, or an HTML report file. The process
//! exits non-zero when any suite fails to prepare or any check records an
//! error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use listgate_cli::SuiteOverrides;
use listgate_cli::SuiteRegistry;
use listgate_core::Check;
use listgate_core::ProgressSink;
use listgate_core::SuiteReport;
use listgate_report::render_html;
use listgate_report::render_text;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "listgate", version, disable_help_subcommand = true)]
struct Cli {
    /// Path to the suite-definitions TOML file.
    #[arg(long, value_name = "PATH", default_value = "listgate.toml", global = true)]
    definitions: PathBuf,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// List the suites declared in the definitions file.
    List(ListCommand),
    /// Run declared suites and report results.
    Run(RunCommand),
}

/// Arguments for suite listing.
#[derive(Args, Debug)]
struct ListCommand {}

/// Arguments for suite execution.
#[derive(Args, Debug)]
struct RunCommand {
    /// Suite names to run; all declared suites when omitted.
    #[arg(value_name = "SUITE")]
    suites: Vec<String>,
    /// Endpoint override; requires exactly one selected suite.
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,
    /// Override the per-parameter single-check budget for all selected
    /// suites.
    #[arg(long, value_name = "N")]
    max_single_checks: Option<usize>,
    /// Override the total multi-parameter check budget for all selected
    /// suites.
    #[arg(long, value_name = "N")]
    max_multi_checks: Option<usize>,
    /// Write an HTML report to this path in addition to terminal output.
    #[arg(long, value_name = "PATH")]
    report_out: Option<PathBuf>,
    /// Summary output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

/// Summary output formats.
#[derive(ValueEnum, Copy, Clone, Debug)]
enum OutputFormat {
    /// Plain-text summary.
    Text,
    /// Pretty-printed JSON report array.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error carrying a terminal-ready message.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.message),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };
    match command {
        Commands::List(_) => command_list(&cli.definitions),
        Commands::Run(command) => command_run(&cli.definitions, &command),
    }
}

// ============================================================================
// SECTION: List Command
// ============================================================================

/// Prints declared suite names, one per line.
fn command_list(definitions: &Path) -> CliResult<ExitCode> {
    let registry = SuiteRegistry::load(definitions).map_err(|err| CliError::new(err.to_string()))?;
    for name in registry.names() {
        write_stdout_line(name).map_err(|err| CliError::new(output_error("stdout", &err)))?;
    }
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Run Command
// ============================================================================

/// Runs the selected suites and renders the aggregate report.
fn command_run(definitions: &Path, command: &RunCommand) -> CliResult<ExitCode> {
    let registry = SuiteRegistry::load(definitions).map_err(|err| CliError::new(err.to_string()))?;
    let selected = select_names(&registry, &command.suites)?;
    if command.endpoint.is_some() && selected.len() != 1 {
        return Err(CliError::new("--endpoint requires exactly one selected suite".to_string()));
    }
    let overrides = SuiteOverrides {
        endpoint: command.endpoint.clone(),
        max_single_checks_per_param: command.max_single_checks,
        max_multi_checks: command.max_multi_checks,
    };

    let mut reports: Vec<SuiteReport> = Vec::with_capacity(selected.len());
    let mut fatal = 0_usize;
    for name in &selected {
        write_stdout_line(&format!("=== {name} ==="))
            .map_err(|err| CliError::new(output_error("stdout", &err)))?;
        match run_suite(&registry, name, &overrides) {
            Ok(report) => reports.push(report),
            Err(err) => {
                // A suite-fatal error stops that suite only.
                fatal += 1;
                write_stderr_line(&format!("suite {name} failed: {}", err.message))
                    .map_err(|io_err| CliError::new(output_error("stderr", &io_err)))?;
            }
        }
    }

    render_summary(&reports, command.format)?;
    if let Some(path) = &command.report_out {
        let html = render_html("Listgate report", &reports);
        fs::write(path, html)
            .map_err(|err| CliError::new(format!("cannot write {}: {err}", path.display())))?;
    }

    let error_count: usize = reports.iter().map(|report| report.error_count).sum();
    if fatal > 0 || error_count > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

/// Resolves the selected suite names, defaulting to every declared suite.
fn select_names(registry: &SuiteRegistry, requested: &[String]) -> CliResult<Vec<String>> {
    if requested.is_empty() {
        return Ok(registry.names().iter().map(ToString::to_string).collect());
    }
    for name in requested {
        registry.definition(name).map_err(|err| CliError::new(err.to_string()))?;
    }
    Ok(requested.to_vec())
}

/// Builds and runs one suite, returning its report.
fn run_suite(
    registry: &SuiteRegistry,
    name: &str,
    overrides: &SuiteOverrides,
) -> CliResult<SuiteReport> {
    let mut suite = registry
        .build(name, overrides)
        .map_err(|err| CliError::new(err.to_string()))?;
    let mut progress = TerminalProgress;
    suite.run(&mut progress).map_err(|err| CliError::new(err.to_string()))?;
    Ok(suite.report())
}

/// Renders the aggregate summary in the requested format.
fn render_summary(reports: &[SuiteReport], format: OutputFormat) -> CliResult<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(reports),
        OutputFormat::Json => serde_json::to_string_pretty(reports)
            .map_err(|err| CliError::new(format!("cannot encode report: {err}")))?,
    };
    write_stdout_line(&rendered).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Progress Output
// ============================================================================

/// Progress sink printing one line per check plus its error records.
#[derive(Debug, Default, Clone, Copy)]
struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn check_started(&mut self, index: usize, total: usize, check: &Check) {
        let _ = write_stdout_line(&format!("{index}/{total}: {}", check.name()));
    }

    fn check_completed(&mut self, check: &Check) {
        let Some(errors) = check.errors() else {
            return;
        };
        for error in errors {
            let _ = write_stdout_line(&format!("  [!] {error}"));
        }
    }
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Prints top-level help to stdout.
fn show_help() -> CliResult<()> {
    let mut command = Cli::command();
    command.print_help().map_err(|err| CliError::new(output_error("stdout", &err)))?;
    write_stdout_line("").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(())
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output-stream write failure.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed writing to {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
