//! Evalview: interactive HTML views of translation-quality evaluations.
//!
//! Evaluators highlight spans of a translation in Label Studio and attach an
//! error category, subcategory, severity and comment to each, plus overall
//! scores for the document. Evalview turns one such evaluation into a
//! standalone page with inline highlights, a legend, an issue table and
//! hover tooltips, and builds a small static site from a manifest of them.
//!
//! # Modules
//!
//! - [`model`]: Evaluation documents, records, facets and site configuration
//! - [`compose`]: Flattening overlapping spans into disjoint runs
//! - [`markdown`]: Markdown rendering that leaves highlight markup untouched
//! - [`html`]: Pages, legend, summary, tooltips and the static site
//! - [`validation`]: Reporting what rendering silently skips or defaults
//! - [`labelstudio`]: Preparing annotation tasks and splitting exports
//! - [`error`]: Error types for evalview operations

pub mod compose;
pub mod error;
pub mod html;
pub mod labelstudio;
pub mod markdown;
pub mod model;
pub mod validation;

use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

pub use error::EvalviewError;

/// The evalview CLI application.
#[derive(Parser)]
#[command(name = "evalview")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Render one evaluation document as a standalone HTML page.
    Render(RenderArgs),
    /// Render every evaluation listed in a site configuration.
    Site(SiteArgs),
    /// Validate an evaluation document for errors and warnings.
    Validate(ValidateArgs),
    /// Split a Label Studio export into one evaluation document per task.
    Split(SplitArgs),
    /// Convert markdown files into Label Studio import tasks.
    Prepare(PrepareArgs),
}

/// Arguments for the render subcommand.
#[derive(clap::Args)]
struct RenderArgs {
    /// Evaluation document (JSON).
    input: PathBuf,

    /// Output HTML file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Site configuration supplying title, translator and footer.
    #[arg(long, env = "EVALVIEW_CONFIG")]
    config: Option<PathBuf>,
}

/// Arguments for the site subcommand.
#[derive(clap::Args)]
struct SiteArgs {
    /// Site configuration (config.json).
    #[arg(long, env = "EVALVIEW_CONFIG")]
    config: PathBuf,

    /// Directory holding the evaluation files (default: the config's directory).
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Directory to write the pages to.
    #[arg(long)]
    out_dir: PathBuf,
}

/// Arguments for the validate subcommand.
#[derive(clap::Args)]
struct ValidateArgs {
    /// Evaluation document to validate.
    input: PathBuf,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long)]
    strict: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the split subcommand.
#[derive(clap::Args)]
struct SplitArgs {
    /// Label Studio JSON export.
    export: PathBuf,

    /// Suffix appended to each output file's base name.
    #[arg(long, default_value = labelstudio::split::DEFAULT_SUFFIX, allow_hyphen_values = true)]
    suffix: String,

    /// Directory to write the evaluation files to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Keep strings exactly as exported, without Latin-1 repair.
    #[arg(long)]
    no_repair_encoding: bool,
}

/// Arguments for the prepare subcommand.
#[derive(clap::Args)]
struct PrepareArgs {
    /// Directory containing the markdown files.
    dir: PathBuf,

    /// Directory to write the task files to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

/// Run the evalview CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), EvalviewError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Render(args)) => run_render(args),
        Some(Commands::Site(args)) => run_site(args),
        Some(Commands::Validate(args)) => run_validate(args),
        Some(Commands::Split(args)) => run_split(args),
        Some(Commands::Prepare(args)) => run_prepare(args),
        None => {
            println!("evalview {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Interactive HTML views of translation-quality evaluations.");
            println!();
            println!("Run 'evalview --help' for usage information.");
            Ok(())
        }
    }
}

/// Logs go to stderr so stdout stays usable for rendered output.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let installed = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
    // Only fails when a global subscriber is already set, e.g. repeated runs
    // in one process; the existing one keeps receiving events.
    if let Err(err) = installed {
        debug!(%err, "keeping existing tracing subscriber");
    }
}

/// Execute the render subcommand.
fn run_render(args: RenderArgs) -> Result<(), EvalviewError> {
    let document = model::document::read_evaluation(&args.input)?;
    let config = args
        .config
        .as_deref()
        .map(model::config::read_config)
        .transpose()?;
    debug!(
        records = document.records.len(),
        text_len = document.source_text.len(),
        "loaded evaluation"
    );

    let ctx = html::RenderContext::new(&document, config.as_ref());
    let page = html::page::render_page(&ctx)?;

    match args.output {
        Some(path) => {
            fs::write(&path, page)?;
            info!(path = %path.display(), "wrote page");
            println!("Rendered {} -> {}", args.input.display(), path.display());
        }
        None => print!("{}", page),
    }
    Ok(())
}

/// Execute the site subcommand.
fn run_site(args: SiteArgs) -> Result<(), EvalviewError> {
    let config = model::config::read_config(&args.config)?;
    let input_dir = match args.input_dir {
        Some(dir) => dir,
        None => config_dir(&args.config),
    };

    let summary = html::site::build_site(&config, &input_dir, &args.out_dir)?;

    println!(
        "Built site in {}: {} page(s), {} missing, {} failed to load",
        args.out_dir.display(),
        summary.pages.len(),
        summary.skipped.len(),
        summary.failed.len()
    );
    Ok(())
}

fn config_dir(config: &Path) -> PathBuf {
    config
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Execute the validate subcommand.
fn run_validate(args: ValidateArgs) -> Result<(), EvalviewError> {
    let document = model::document::read_evaluation(&args.input)?;

    let opts = validation::ValidateOptions {
        strict: args.strict,
    };
    let report = validation::validate_document(&document, &opts);

    match args.output.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&report).map_err(|source| {
                EvalviewError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", json);
        }
        "text" => print!("{}", report),
        other => {
            return Err(EvalviewError::UnsupportedFormat(format!(
                "'{}' (supported: text, json)",
                other
            )));
        }
    }

    let has_errors = report.error_count() > 0;
    let has_warnings = report.warning_count() > 0;

    if has_errors || (args.strict && has_warnings) {
        Err(EvalviewError::ValidationFailed {
            error_count: report.error_count(),
            warning_count: report.warning_count(),
            report,
        })
    } else {
        Ok(())
    }
}

/// Execute the split subcommand.
fn run_split(args: SplitArgs) -> Result<(), EvalviewError> {
    let opts = labelstudio::split::SplitOptions {
        suffix: args.suffix,
        repair_encoding: !args.no_repair_encoding,
    };
    let outcome = labelstudio::split::split_export(&args.export, &args.out_dir, &opts)?;

    for path in &outcome.written {
        println!("Created: {}", path.display());
    }
    for skipped in &outcome.skipped {
        println!("Skipped: {} ({:?})", skipped.source_file, skipped.reason);
    }
    println!(
        "Split {} evaluation file(s), skipped {} task(s)",
        outcome.written.len(),
        outcome.skipped.len()
    );
    Ok(())
}

/// Execute the prepare subcommand.
fn run_prepare(args: PrepareArgs) -> Result<(), EvalviewError> {
    let written = labelstudio::prepare::prepare_dir(&args.dir, &args.out_dir)?;

    for path in &written {
        println!("Created: {}", path.display());
    }
    println!("Prepared {} task file(s)", written.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_can_be_initialised_repeatedly() {
        init_logging(0);
        init_logging(2);
        tracing::debug!("still logging");
    }
}
