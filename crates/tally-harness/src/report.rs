//! Report text layout
//!
//! The legacy style reproduces the historical output byte for byte: names are
//! embedded verbatim and the failure block ends with `<failure/>`. The
//! well-formed style keeps the same layout but escapes every embedded string
//! and closes failures with `</failure>`.

use crate::recorder::FailureReport;
use std::borrow::Cow;
use std::io::{self, Write};

/// First line of every report
pub const PREAMBLE: &str = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>";

/// Message attribute carried by every failure element
pub const FAILURE_MESSAGE: &str = "Test case check failure";

/// Markup flavour of the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Historical markup, not guaranteed to be well-formed XML
    #[default]
    Legacy,
    /// Escaped names and values, matched failure tags
    WellFormed,
}

impl ReportStyle {
    /// Parse `"legacy"` or `"well-formed"`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "legacy" => Some(ReportStyle::Legacy),
            "well-formed" => Some(ReportStyle::WellFormed),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ReportStyle::Legacy => "legacy",
            ReportStyle::WellFormed => "well-formed",
        }
    }

    pub fn write_preamble(self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "{}", PREAMBLE)
    }

    pub fn write_suite_start(self, out: &mut impl Write, name: &str) -> io::Result<()> {
        writeln!(out, "<testsuite name=\"{}\">", self.attr(name))
    }

    pub fn write_suite_end(self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "</testsuite>")
    }

    pub fn write_case_start(self, out: &mut impl Write, name: &str) -> io::Result<()> {
        writeln!(out, "    <testcase name=\"{}\">", self.attr(name))
    }

    pub fn write_case_end(self, out: &mut impl Write) -> io::Result<()> {
        writeln!(out, "    </testcase>")
    }

    /// Write one failure block.
    ///
    /// The expected value is printed first: "Value <expected> was expected
    /// instead of <actual>".
    pub fn write_failure(self, out: &mut impl Write, report: &FailureReport) -> io::Result<()> {
        let expected = report.expected.to_string();
        let actual = report.actual.to_string();

        writeln!(out, "        <failure message=\"{}\">", FAILURE_MESSAGE)?;
        writeln!(
            out,
            "            File \"{}\", line {}, on function {}",
            self.text(&report.file),
            report.line,
            self.text(&report.function)
        )?;
        writeln!(
            out,
            "            Value {} was expected instead of {}",
            self.text(&expected),
            self.text(&actual)
        )?;
        match self {
            ReportStyle::Legacy => writeln!(out, "        <failure/>"),
            ReportStyle::WellFormed => writeln!(out, "        </failure>"),
        }
    }

    fn attr<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            ReportStyle::Legacy => Cow::Borrowed(value),
            ReportStyle::WellFormed => escape(value, true),
        }
    }

    fn text<'a>(self, value: &'a str) -> Cow<'a, str> {
        match self {
            ReportStyle::Legacy => Cow::Borrowed(value),
            ReportStyle::WellFormed => escape(value, false),
        }
    }
}

/// XML entity escaping; quotes are only escaped inside attributes.
fn escape(value: &str, in_attribute: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>') || (in_attribute && c == '"');
    if !value.contains(needs_escape) {
        return Cow::Borrowed(value);
    }

    let mut escaped = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if in_attribute => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
