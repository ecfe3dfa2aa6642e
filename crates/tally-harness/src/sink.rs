//! Report sink - where the report text goes
//!
//! The sink defaults to standard output. A named file is created (truncating
//! any previous content) when selected and released by [`ReportSink::close`].
//! The two standard streams are never closed, only flushed.

use crate::{HarnessError, HarnessResult};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::PathBuf;

/// A report destination selected by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Standard output (also selected by `"default"`)
    Stdout,
    /// Standard error
    Stderr,
    /// A file, created or truncated on selection
    File(PathBuf),
    /// In-memory buffer, read back with [`ReportSink::captured`]
    Capture,
    /// Drop everything
    Discard,
}

impl Destination {
    /// Parse a destination name.
    ///
    /// `"default"` and `"stdout"` select standard output, `"stderr"` selects
    /// standard error and any other non-empty text is a file path. The empty
    /// string selects nothing and returns `None`.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "" => None,
            "default" | "stdout" => Some(Destination::Stdout),
            "stderr" => Some(Destination::Stderr),
            path => Some(Destination::File(PathBuf::from(path))),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "stdout"),
            Destination::Stderr => write!(f, "stderr"),
            Destination::File(path) => write!(f, "{}", path.display()),
            Destination::Capture => write!(f, "<capture>"),
            Destination::Discard => write!(f, "<discard>"),
        }
    }
}

/// The active output stream for report text
#[derive(Debug, Default)]
pub enum ReportSink {
    #[default]
    Stdout,
    Stderr,
    File {
        path: PathBuf,
        writer: BufWriter<File>,
    },
    Capture(Vec<u8>),
    Discard,
}

impl ReportSink {
    /// Create a sink writing into an in-memory buffer
    pub fn capture() -> Self {
        ReportSink::Capture(Vec::new())
    }

    /// Open a sink for the given destination
    pub fn open(destination: Destination) -> HarnessResult<Self> {
        Ok(match destination {
            Destination::Stdout => ReportSink::Stdout,
            Destination::Stderr => ReportSink::Stderr,
            Destination::File(path) => {
                let file = File::create(&path).map_err(|source| HarnessError::OpenReport {
                    path: path.clone(),
                    source,
                })?;
                ReportSink::File {
                    path,
                    writer: BufWriter::new(file),
                }
            }
            Destination::Capture => ReportSink::capture(),
            Destination::Discard => ReportSink::Discard,
        })
    }

    /// Switch to another destination, closing any open file first.
    ///
    /// If the new destination cannot be opened the sink discards all further
    /// writes and the open error is returned.
    pub fn configure(&mut self, destination: Destination) -> HarnessResult<()> {
        let closed = self.close();
        tracing::info!(%destination, "configuring report sink");

        match ReportSink::open(destination) {
            Ok(sink) => *self = sink,
            Err(e) => {
                if let Err(previous) = &closed {
                    tracing::warn!(error = %previous, "failed to close previous report destination");
                }
                tracing::warn!(error = %e, "report sink falls back to discard");
                *self = ReportSink::Discard;
                return Err(e);
            }
        }

        closed
    }

    /// Switch destination by name (see [`Destination::parse`]).
    /// The empty name leaves the sink untouched.
    pub fn configure_str(&mut self, name: &str) -> HarnessResult<()> {
        match Destination::parse(name) {
            Some(destination) => self.configure(destination),
            None => Ok(()),
        }
    }

    /// Flush and release an open file; the sink reverts to standard output.
    ///
    /// Standard streams are flushed but stay open. Capture buffers keep
    /// their content.
    pub fn close(&mut self) -> HarnessResult<()> {
        match self {
            ReportSink::File { .. } => {
                if let ReportSink::File { path, mut writer } = mem::take(self) {
                    writer.flush()?;
                    tracing::debug!(path = %path.display(), "closed report file");
                }
            }
            ReportSink::Stdout => io::stdout().flush()?,
            ReportSink::Stderr => io::stderr().flush()?,
            ReportSink::Capture(_) | ReportSink::Discard => {}
        }
        Ok(())
    }

    /// Whether the sink is one of the two standard streams
    pub fn is_standard(&self) -> bool {
        matches!(self, ReportSink::Stdout | ReportSink::Stderr)
    }

    /// Captured report bytes, if this is a capture sink
    pub fn captured(&self) -> Option<&[u8]> {
        match self {
            ReportSink::Capture(buffer) => Some(buffer),
            _ => None,
        }
    }

    /// Take the captured bytes, leaving an empty buffer behind
    pub fn take_captured(&mut self) -> Option<Vec<u8>> {
        match self {
            ReportSink::Capture(buffer) => Some(mem::take(buffer)),
            _ => None,
        }
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            ReportSink::Stdout => io::stdout().lock().write(buf),
            ReportSink::Stderr => io::stderr().lock().write(buf),
            ReportSink::File { writer, .. } => writer.write(buf),
            ReportSink::Capture(buffer) => buffer.write(buf),
            ReportSink::Discard => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            ReportSink::Stdout => io::stdout().flush(),
            ReportSink::Stderr => io::stderr().flush(),
            ReportSink::File { writer, .. } => writer.flush(),
            ReportSink::Capture(_) | ReportSink::Discard => Ok(()),
        }
    }
}
