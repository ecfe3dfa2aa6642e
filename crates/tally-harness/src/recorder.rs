//! Failure recorder - counts failed checks and reports them

use crate::report::ReportStyle;
use crate::sink::ReportSink;
use crate::{HarnessError, HarnessResult};
use std::fmt;
use std::io;

/// A value shown in a failure block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportValue {
    Signed(i64),
    Unsigned(u64),
    /// An integer outside the range of its check, in decimal
    OutOfRange(String),
    Text(String),
}

impl fmt::Display for ReportValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportValue::Signed(v) => write!(f, "{}", v),
            ReportValue::Unsigned(v) => write!(f, "{}", v),
            ReportValue::OutOfRange(v) => f.write_str(v),
            ReportValue::Text(s) => write!(f, "\"{}\"", s),
        }
    }
}

/// A single failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Function containing the check
    pub function: String,
    /// Source file containing the check
    pub file: String,
    /// Line of the check
    pub line: u32,
    pub expected: ReportValue,
    pub actual: ReportValue,
}

/// Failure counter plus the sink failures are written to.
///
/// The count only ever grows. Write errors never interrupt a check: the first
/// one is kept and handed out by [`FailureRecorder::take_write_error`].
#[derive(Debug, Default)]
pub struct FailureRecorder {
    failure_count: u64,
    sink: ReportSink,
    style: ReportStyle,
    write_error: Option<io::Error>,
}

impl FailureRecorder {
    /// Create a recorder writing legacy-style text to standard output
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sink(mut self, sink: ReportSink) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_style(mut self, style: ReportStyle) -> Self {
        self.style = style;
        self
    }

    /// Count a failure and write its block to the sink
    pub fn record_failure(&mut self, report: &FailureReport) {
        self.failure_count += 1;
        tracing::debug!(
            function = %report.function,
            file = %report.file,
            line = report.line,
            expected = %report.expected,
            actual = %report.actual,
            "check failed"
        );

        let written = self.style.write_failure(&mut self.sink, report);
        self.keep_write_error(written);
    }

    /// Cumulative number of recorded failures
    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn style(&self) -> ReportStyle {
        self.style
    }

    pub fn set_style(&mut self, style: ReportStyle) {
        self.style = style;
    }

    pub fn sink(&self) -> &ReportSink {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut ReportSink {
        &mut self.sink
    }

    /// Write report framing through a closure, keeping the first error
    pub(crate) fn emit(
        &mut self,
        write: impl FnOnce(ReportStyle, &mut ReportSink) -> io::Result<()>,
    ) {
        let written = write(self.style, &mut self.sink);
        self.keep_write_error(written);
    }

    /// Take the first write error seen since the last call
    pub fn take_write_error(&mut self) -> HarnessResult<()> {
        match self.write_error.take() {
            Some(e) => Err(HarnessError::WriteReport(e)),
            None => Ok(()),
        }
    }

    fn keep_write_error(&mut self, written: io::Result<()>) {
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write report text");
            if self.write_error.is_none() {
                self.write_error = Some(e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn failure(line: u32) -> FailureReport {
        FailureReport {
            function: "add_negatives".to_string(),
            file: "main.rs".to_string(),
            line,
            expected: ReportValue::Signed(-4),
            actual: ReportValue::Signed(3),
        }
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_value_formatting() {
        assert_eq!(ReportValue::Signed(-4).to_string(), "-4");
        assert_eq!(ReportValue::Signed(4).to_string(), "4");
        assert_eq!(ReportValue::Unsigned(30).to_string(), "30");
        assert_eq!(
            ReportValue::OutOfRange("18446744073709551616".into()).to_string(),
            "18446744073709551616"
        );
        assert_eq!(ReportValue::Text("Text 1".into()).to_string(), "\"Text 1\"");
    }

    #[test]
    fn test_record_increments_by_one() {
        let mut recorder = FailureRecorder::new().with_sink(ReportSink::capture());
        assert_eq!(recorder.failure_count(), 0);

        recorder.record_failure(&failure(13));
        assert_eq!(recorder.failure_count(), 1);

        recorder.record_failure(&failure(14));
        assert_eq!(recorder.failure_count(), 2);

        let text = String::from_utf8(recorder.sink().captured().unwrap().to_vec()).unwrap();
        assert_eq!(text.matches("<failure message=").count(), 2);
        assert!(text.contains("File \"main.rs\", line 13, on function add_negatives"));
        assert!(text.contains("Value -4 was expected instead of 3"));
    }

    #[test]
    fn test_write_error_is_kept_not_raised() {
        let mut recorder = FailureRecorder::new();
        recorder.emit(|_, _| BrokenPipe.write_all(b"x"));
        recorder.emit(|_, _| Err(io::Error::new(io::ErrorKind::Other, "second")));

        match recorder.take_write_error() {
            Err(HarnessError::WriteReport(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(recorder.take_write_error().is_ok());
    }
}
