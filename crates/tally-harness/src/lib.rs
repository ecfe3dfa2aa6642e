//! Tally test harness
//!
//! A small in-process unit-test harness: register named test cases grouped into
//! named suites, run them in order, record every failed check and emit an
//! XML-like report.
//!
//! # Components
//!
//! - [`check`] - equality checks (signed, unsigned, string) and call-site macros
//! - [`recorder`] - failure counter plus the active report sink
//! - [`sink`] - report destinations (stdout, stderr, file, capture, discard)
//! - [`report`] - report text layout in legacy or well-formed style
//! - [`registry`] - test cases and test suites
//! - [`runner`] - executes suites and frames the report
//!
//! # Example
//!
//! ```no_run
//! use tally_harness::{check_equal, check_equal_strings, Checker, Runner, TestCase, TestSuite};
//!
//! fn add_positives(check: &mut Checker) {
//!     check_equal!(check, 8, 5 + 3);
//! }
//!
//! let calculator = TestSuite::new("Calculator")
//!     .with_case(TestCase::new("AddPositives", add_positives))
//!     .with_case(TestCase::new("CompareTexts", |check| {
//!         check_equal_strings!(check, "Text", "Text");
//!     }));
//!
//! let mut runner = Runner::new();
//! let failures = runner.run(&[&calculator]).unwrap();
//! assert_eq!(failures, 0);
//! ```

pub mod check;
pub mod recorder;
pub mod registry;
pub mod report;
pub mod runner;
pub mod sink;

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Harness errors
///
/// Check mismatches are never errors; they are counted and reported.
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Failed to open report file {path}: {source}")]
    OpenReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write report: {0}")]
    WriteReport(#[from] io::Error),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

// Re-export main types
pub use check::{Checker, Location};
pub use recorder::{FailureRecorder, FailureReport, ReportValue};
pub use registry::{TestBody, TestCase, TestSuite};
pub use report::ReportStyle;
pub use runner::{CaseRun, RunSummary, Runner};
pub use sink::{Destination, ReportSink};
