use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod reporter;
mod samples;

/// Tally in-process test harness.
///
/// Runs the bundled sample suites and writes an XML-like report. The exit
/// status is the number of failed checks (capped at 255).
///
/// EXAMPLES:
///     tally run                        Report to stdout
///     tally run --report report.xml    Report to a file
///     tally run --suite Dummy          Run a single suite
///     tally list                       Show suites and cases
///
/// ENVIRONMENT VARIABLES:
///     TALLY_REPORT        Report destination (stdout, stderr or a path)
///     TALLY_REPORT_STYLE  legacy or well-formed
///     TALLY_SUMMARY       text, json or none
///     TALLY_LOG           Log filter (e.g. debug, tally_harness=trace)
///     NO_COLOR            Set to disable colored output
#[derive(Parser)]
#[command(name = "tally")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the bundled suites
    ///
    /// Writes the report to the selected destination and a summary to stderr.
    ///
    /// EXAMPLES:
    ///     tally run --style well-formed       Escaped, balanced markup
    ///     tally run --summary json            Machine-readable summary
    #[command(visible_alias = "r")]
    Run {
        /// Report destination: stdout, stderr, default or a file path
        #[arg(long, short = 'o')]
        report: Option<String>,
        /// Report markup style
        #[arg(long, value_parser = ["legacy", "well-formed"])]
        style: Option<String>,
        /// Console summary format
        #[arg(long, value_parser = ["text", "json", "none"])]
        summary: Option<String>,
        /// Show one summary line per test case
        #[arg(long, short = 'v')]
        verbose: bool,
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
        /// Run only the named suite (repeatable, keeps the given order)
        #[arg(long = "suite", short = 's')]
        suites: Vec<String>,
    },

    /// List the bundled suites and their cases
    #[command(visible_alias = "ls")]
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("TALLY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Process status for a failure count
fn exit_status(failures: u64) -> u8 {
    u8::try_from(failures).unwrap_or(u8::MAX)
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging();

    match cli.command {
        Commands::Run {
            report,
            style,
            summary,
            verbose,
            no_color,
            suites,
        } => {
            let failures = commands::run::run(commands::run::RunArgs {
                report,
                style,
                summary,
                verbose,
                no_color,
                suites,
                dir: None,
                global_config: None,
            })?;
            Ok(ExitCode::from(exit_status(failures)))
        }
        Commands::List { json } => {
            commands::list::run(json)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_run_flags() {
        let cli = Cli::parse_from([
            "tally", "run", "--report", "out.xml", "--style", "well-formed", "-s", "Dummy", "-s",
            "Calculator",
        ]);
        match cli.command {
            Commands::Run {
                report,
                style,
                suites,
                ..
            } => {
                assert_eq!(report.as_deref(), Some("out.xml"));
                assert_eq!(style.as_deref(), Some("well-formed"));
                assert_eq!(suites, ["Dummy", "Calculator"]);
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_style() {
        assert!(Cli::try_parse_from(["tally", "run", "--style", "fancy"]).is_err());
    }

    #[test]
    fn test_cli_list_alias() {
        let cli = Cli::parse_from(["tally", "ls", "--json"]);
        match cli.command {
            Commands::List { json } => assert!(json),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_status_caps() {
        assert_eq!(exit_status(4), 4);
        assert_eq!(exit_status(1000), 255);
    }
}
