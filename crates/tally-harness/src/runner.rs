//! Test runner - execute suites and frame the report

use crate::check::Checker;
use crate::recorder::FailureRecorder;
use crate::registry::{TestCase, TestSuite};
use crate::report::ReportStyle;
use crate::sink::ReportSink;
use crate::HarnessResult;
use std::io::Write;
use std::time::{Duration, Instant};

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRun {
    /// Suite the case belongs to
    pub suite: String,
    /// Case name
    pub case: String,
    /// Checks that failed inside this case
    pub failures: u64,
    /// Wall time spent in the case body
    pub duration: Duration,
}

impl CaseRun {
    pub fn is_pass(&self) -> bool {
        self.failures == 0
    }

    pub fn is_fail(&self) -> bool {
        self.failures > 0
    }
}

/// Everything one call to [`Runner::run_detailed`] produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Case outcomes in execution order
    pub cases: Vec<CaseRun>,
    /// Cumulative failure count of the runner after this run
    pub failure_count: u64,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.cases.len()
    }

    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|c| c.is_pass()).count()
    }

    pub fn failed(&self) -> usize {
        self.cases.iter().filter(|c| c.is_fail()).count()
    }

    /// Failed checks recorded during this run only
    pub fn run_failures(&self) -> u64 {
        self.cases.iter().map(|c| c.failures).sum()
    }

    pub fn duration(&self) -> Duration {
        self.cases.iter().map(|c| c.duration).sum()
    }
}

/// Runs suites in order and owns the run state (failure count and sink).
///
/// The failure count is cumulative over every `run` of the same runner.
#[derive(Debug, Default)]
pub struct Runner {
    recorder: FailureRecorder,
}

impl Runner {
    /// Create a runner reporting legacy-style text to standard output
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        *self.recorder.sink_mut() = sink;
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.recorder.set_style(style);
        self
    }

    /// Select the report destination by name (`"stdout"`, `"stderr"`,
    /// `"default"`, a file path, or `""` for no change)
    pub fn configure_report(&mut self, destination: &str) -> HarnessResult<()> {
        self.recorder.sink_mut().configure_str(destination)
    }

    /// Release the report file, if one is open
    pub fn close_report(&mut self) -> HarnessResult<()> {
        self.recorder.sink_mut().close()
    }

    pub fn failure_count(&self) -> u64 {
        self.recorder.failure_count()
    }

    pub fn recorder(&self) -> &FailureRecorder {
        &self.recorder
    }

    pub fn sink(&self) -> &ReportSink {
        self.recorder.sink()
    }

    pub fn sink_mut(&mut self) -> &mut ReportSink {
        self.recorder.sink_mut()
    }

    /// Run all suites and return the cumulative failure count
    pub fn run(&mut self, suites: &[&TestSuite]) -> HarnessResult<u64> {
        Ok(self.run_detailed(suites)?.failure_count)
    }

    /// Run all suites and return per-case outcomes
    pub fn run_detailed(&mut self, suites: &[&TestSuite]) -> HarnessResult<RunSummary> {
        let mut summary = RunSummary::default();

        self.recorder.emit(|style, sink| style.write_preamble(sink));
        for suite in suites {
            self.run_suite(suite, &mut summary.cases);
        }
        self.recorder.emit(|_, sink| sink.flush());
        self.recorder.take_write_error()?;

        summary.failure_count = self.recorder.failure_count();
        tracing::debug!(
            cases = summary.total(),
            failed = summary.failed(),
            failure_count = summary.failure_count,
            "run finished"
        );
        Ok(summary)
    }

    fn run_suite(&mut self, suite: &TestSuite, runs: &mut Vec<CaseRun>) {
        tracing::debug!(suite = suite.name(), cases = suite.len(), "running suite");

        self.recorder
            .emit(|style, sink| style.write_suite_start(sink, suite.name()));
        for case in suite.cases() {
            runs.push(self.run_case(suite, case));
        }
        self.recorder.emit(|style, sink| style.write_suite_end(sink));
    }

    fn run_case(&mut self, suite: &TestSuite, case: &TestCase) -> CaseRun {
        tracing::debug!(suite = suite.name(), case = case.name(), "running case");

        self.recorder
            .emit(|style, sink| style.write_case_start(sink, case.name()));

        let start = Instant::now();
        let mut checker = Checker::new(&mut self.recorder);
        case.run(&mut checker);
        let failures = checker.failures();
        let duration = start.elapsed();

        self.recorder.emit(|style, sink| style.write_case_end(sink));

        CaseRun {
            suite: suite.name().to_string(),
            case: case.name().to_string(),
            failures,
            duration,
        }
    }
}
