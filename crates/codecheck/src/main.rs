use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use codecheck_core::config::Config;
use codecheck_core::pipeline::CheckPipeline;
use codecheck_core::registry::CheckerRegistry;
use codecheck_core::types::{CheckRequest, Filter};

use codecheck_flake8::Flake8Checker;
use codecheck_pydocstyle::PydocstyleChecker;
use codecheck_pylint::PylintChecker;
use codecheck_report::{json, text};

#[derive(Parser)]
#[command(name = "codecheck")]
#[command(about = "Run a Python checker over a file or tree and filter its output")]
#[command(version)]
struct Cli {
    /// Checker to run (flake8, pylint, pydocstyle)
    #[arg(short, long)]
    tool: String,
    /// File or directory to check; directories are walked recursively
    #[arg(short, long)]
    source: PathBuf,
    /// flake8 only: report files with a message whose code starts with CODE
    #[arg(long, value_name = "CODE")]
    select: Option<String>,
    /// pylint only: print messages without scores or the average
    #[arg(long, conflicts_with_all = ["select", "scores_less_than"])]
    errors_only: bool,
    /// pylint only: report files scoring below THRESHOLD
    #[arg(long, value_name = "THRESHOLD", conflicts_with = "select")]
    scores_less_than: Option<f64>,
    /// Config file path (defaults to .codecheck.toml next to or above the source)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Single-line JSON output
    #[arg(long)]
    compact: bool,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn filter(&self) -> Option<Filter> {
        if let Some(ref code) = self.select {
            Some(Filter::Select(code.clone()))
        } else if self.errors_only {
            Some(Filter::ErrorsOnly)
        } else {
            self.scores_less_than.map(Filter::ScoresLessThan)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(2);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli.source, cli.config.as_deref())?;
    let registry = build_registry()?;
    let request = CheckRequest::new(cli.tool.clone(), cli.source.clone()).with_filter(cli.filter());
    tracing::debug!(
        tool = %request.tool,
        source = %request.source.display(),
        filter = ?request.filter,
        excludes = config.project.exclude_patterns.len(),
        "starting check"
    );

    let pipeline = CheckPipeline::new(registry, config);
    let report = pipeline.run(&request)?;

    match cli.format {
        OutputFormat::Text => print!("{}", text::format_report(&report)),
        OutputFormat::Json => println!("{}", json::format_report(&report, cli.compact)),
    }
    Ok(())
}

fn load_config(source: &Path, config_path: Option<&Path>) -> Result<Config> {
    match config_path {
        Some(p) => Config::load(p),
        None => Ok(Config::load_or_default(source)),
    }
}

/// The dispatch table of built-in checkers.
fn build_registry() -> Result<CheckerRegistry> {
    let registry = CheckerRegistry::new()
        .with(Box::new(
            Flake8Checker::new().context("failed to initialize flake8 checker")?,
        ))
        .with(Box::new(
            PylintChecker::new().context("failed to initialize pylint checker")?,
        ))
        .with(Box::new(
            PydocstyleChecker::new().context("failed to initialize pydocstyle checker")?,
        ));
    Ok(registry)
}
