//! Run command - execute the bundled suites and write the report

use crate::reporter::{SummaryFormat, SummaryReporter};
use crate::samples;
use anyhow::{anyhow, bail, Context, Result};
use std::path::PathBuf;
use tally_config::{Config, ConfigLoader};
use tally_harness::{ReportStyle, Runner, TestSuite};

/// Arguments for the run command; `None` falls back to configuration
#[derive(Debug, Default)]
pub struct RunArgs {
    /// Report destination ("stdout", "stderr", "default" or a file path)
    pub report: Option<String>,
    /// Report style ("legacy" or "well-formed")
    pub style: Option<String>,
    /// Summary format ("text", "json" or "none")
    pub summary: Option<String>,
    /// Print one summary line per case
    pub verbose: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Run only these suites, in this order
    pub suites: Vec<String>,
    /// Directory to search for tally.toml (defaults to the current directory)
    pub dir: Option<PathBuf>,
    /// Global settings file (defaults to ~/.tally/config.toml)
    pub global_config: Option<PathBuf>,
}

/// Settings after merging flags over configuration
#[derive(Debug, Clone, PartialEq)]
struct Resolved {
    destination: String,
    style: ReportStyle,
    summary: SummaryFormat,
    verbose: bool,
    color: bool,
}

fn resolve(args: &RunArgs, config: &Config) -> Result<Resolved> {
    let style_name = args.style.as_deref().unwrap_or(config.report_style());
    let style = ReportStyle::parse(style_name)
        .ok_or_else(|| anyhow!("Unknown report style '{}'", style_name))?;

    let summary_name = args.summary.as_deref().unwrap_or(config.summary());
    let summary = SummaryFormat::parse(summary_name)
        .ok_or_else(|| anyhow!("Unknown summary format '{}'", summary_name))?;

    Ok(Resolved {
        destination: args
            .report
            .clone()
            .unwrap_or_else(|| config.report_destination().to_string()),
        style,
        summary,
        verbose: args.verbose || config.verbose(),
        color: !args.no_color && config.color(),
    })
}

/// Run the bundled suites and return the cumulative failure count
pub fn run(args: RunArgs) -> Result<u64> {
    let dir = match &args.dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("Failed to read current directory")?,
    };
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.global_config {
        loader = loader.with_global_config_path(path);
    }
    let config = loader
        .load_from_directory(&dir)
        .context("Failed to load configuration")?;
    let resolved = resolve(&args, &config)?;
    tracing::debug!(?resolved, "resolved run settings");

    let suites = match samples::select(samples::suites(), &args.suites) {
        Ok(suites) => suites,
        Err(unknown) => bail!("Unknown suite(s): {}", unknown.join(", ")),
    };
    let refs: Vec<&TestSuite> = suites.iter().collect();

    let mut runner = Runner::new().with_style(resolved.style);
    runner
        .configure_report(&resolved.destination)
        .with_context(|| format!("Failed to open report destination '{}'", resolved.destination))?;

    let outcome = runner.run_detailed(&refs);
    let closed = runner.close_report();
    let summary = outcome.context("Failed to write report")?;
    closed.context("Failed to close report")?;

    SummaryReporter::new(resolved.verbose)
        .with_no_color(!resolved.color)
        .with_format(resolved.summary)
        .report(&summary)
        .context("Failed to print summary")?;

    Ok(summary.failure_count)
}
