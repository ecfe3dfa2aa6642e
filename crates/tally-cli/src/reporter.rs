//! Console summary - human or JSON rendering of a run
//!
//! Everything goes to stderr so a report on stdout stays untouched.

use colored::*;
use std::io::{self, Write};
use tally_harness::{CaseRun, RunSummary};

/// Console summary format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    Text,
    Json,
    None,
}

impl SummaryFormat {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "text" => Some(SummaryFormat::Text),
            "json" => Some(SummaryFormat::Json),
            "none" => Some(SummaryFormat::None),
            _ => None,
        }
    }
}

/// Summary printer with output configuration
pub struct SummaryReporter {
    /// Show one line per test case
    verbose: bool,
    /// Disable colored output
    no_color: bool,
    format: SummaryFormat,
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl SummaryReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            no_color: false,
            format: SummaryFormat::Text,
        }
    }

    pub fn with_no_color(mut self, no_color: bool) -> Self {
        self.no_color = no_color;
        self
    }

    pub fn with_format(mut self, format: SummaryFormat) -> Self {
        self.format = format;
        self
    }

    /// Print the summary to stderr
    pub fn report(&self, summary: &RunSummary) -> io::Result<()> {
        let mut err = io::stderr().lock();
        self.write_to(&mut err, summary)
    }

    pub fn write_to(&self, out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
        match self.format {
            SummaryFormat::None => Ok(()),
            SummaryFormat::Json => writeln!(out, "{}", to_json(summary)),
            SummaryFormat::Text => {
                if self.no_color {
                    colored::control::set_override(false);
                }
                let written = self.write_text(out, summary);
                if self.no_color {
                    colored::control::unset_override();
                }
                written
            }
        }
    }

    fn write_text(&self, out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
        for run in &summary.cases {
            self.write_case(out, run)?;
        }

        // Dots need a newline
        if !self.verbose && !summary.cases.is_empty() {
            writeln!(out)?;
        }

        writeln!(out)?;
        self.write_totals(out, summary)?;
        self.write_failures(out, summary)
    }

    fn write_case(&self, out: &mut impl Write, run: &CaseRun) -> io::Result<()> {
        match (run.is_pass(), self.verbose) {
            (true, true) => writeln!(
                out,
                "{} {}::{} ({:.2?})",
                "PASS".green().bold(),
                run.suite,
                run.case,
                run.duration
            ),
            (false, true) => writeln!(
                out,
                "{} {}::{} ({} failed check{}, {:.2?})",
                "FAIL".red().bold(),
                run.suite,
                run.case,
                run.failures,
                if run.failures == 1 { "" } else { "s" },
                run.duration
            ),
            (true, false) => write!(out, "{}", ".".green()),
            (false, false) => write!(out, "{}", "F".red().bold()),
        }
    }

    fn write_totals(&self, out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
        let failed = summary.failed();

        writeln!(out, "{}", "─".repeat(50))?;

        let status = if failed > 0 {
            "FAILED".red().bold()
        } else {
            "PASSED".green().bold()
        };

        writeln!(
            out,
            "Test result: {} | {} cases, {} passed, {} failed",
            status,
            summary.total().to_string().bold(),
            summary.passed().to_string().green().bold(),
            if failed > 0 {
                failed.to_string().red().bold()
            } else {
                failed.to_string().normal()
            }
        )?;
        writeln!(
            out,
            "Failed checks: {} this run, {} total",
            summary.run_failures(),
            summary.failure_count
        )?;
        writeln!(out, "Time: {:.2?}", summary.duration())
    }

    fn write_failures(&self, out: &mut impl Write, summary: &RunSummary) -> io::Result<()> {
        let failures: Vec<_> = summary.cases.iter().filter(|r| r.is_fail()).collect();
        if failures.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "{}", "Failures:".red().bold())?;
        for run in failures {
            writeln!(
                out,
                "  {} {}::{} ({})",
                "●".red(),
                run.suite,
                run.case.bold(),
                run.failures
            )?;
        }
        Ok(())
    }
}

/// JSON rendering of a run summary
pub fn to_json(summary: &RunSummary) -> serde_json::Value {
    let cases: Vec<_> = summary
        .cases
        .iter()
        .map(|r| {
            serde_json::json!({
                "suite": r.suite,
                "case": r.case,
                "failures": r.failures,
                "passed": r.is_pass(),
                "duration_ms": r.duration.as_millis(),
            })
        })
        .collect();

    serde_json::json!({
        "cases": summary.total(),
        "passed": summary.passed(),
        "failed": summary.failed(),
        "failed_checks": summary.run_failures(),
        "failure_count": summary.failure_count,
        "results": cases,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn make_run(case: &str, failures: u64) -> CaseRun {
        CaseRun {
            suite: "Calculator".to_string(),
            case: case.to_string(),
            failures,
            duration: Duration::from_millis(2),
        }
    }

    fn summary() -> RunSummary {
        RunSummary {
            cases: vec![make_run("AddPositives", 2), make_run("Identity", 0)],
            failure_count: 2,
        }
    }

    fn render(reporter: SummaryReporter, summary: &RunSummary) -> String {
        let mut out = Vec::new();
        reporter.write_to(&mut out, summary).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_verbose_text() {
        let text = render(SummaryReporter::new(true).with_no_color(true), &summary());

        assert!(text.contains("FAIL Calculator::AddPositives (2 failed checks"));
        assert!(text.contains("PASS Calculator::Identity"));
        assert!(text.contains("Test result: FAILED | 2 cases, 1 passed, 1 failed"));
        assert!(text.contains("Failed checks: 2 this run, 2 total"));
        assert!(text.contains("Failures:"));
    }

    #[test]
    fn test_quiet_text_prints_dots() {
        let text = render(SummaryReporter::new(false).with_no_color(true), &summary());
        assert!(text.starts_with("F.\n"));
    }

    #[test]
    fn test_empty_run() {
        let text = render(
            SummaryReporter::new(true).with_no_color(true),
            &RunSummary::default(),
        );
        assert!(text.contains("PASSED"));
        assert!(!text.contains("Failures:"));
    }

    #[test]
    fn test_json_summary() {
        let text = render(
            SummaryReporter::new(false).with_format(SummaryFormat::Json),
            &summary(),
        );
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["cases"], 2);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["failure_count"], 2);
        assert_eq!(value["results"][0]["case"], "AddPositives");
        assert_eq!(value["results"][1]["passed"], true);
    }

    #[test]
    fn test_none_prints_nothing() {
        let text = render(
            SummaryReporter::new(true).with_format(SummaryFormat::None),
            &summary(),
        );
        assert!(text.is_empty());
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(SummaryFormat::parse("json"), Some(SummaryFormat::Json));
        assert_eq!(SummaryFormat::parse("xml"), None);
    }
}
