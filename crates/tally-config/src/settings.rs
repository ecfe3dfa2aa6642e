//! Settings file layout (tally.toml and ~/.tally/config.toml)
//!
//! Both files share the same sections:
//!
//! ```toml
//! [report]
//! destination = "report.xml"   # "default" | "stdout" | "stderr" | file path
//! style = "legacy"             # "legacy" | "well-formed"
//!
//! [console]
//! verbose = false
//! color = true
//! summary = "text"             # "text" | "json" | "none"
//! ```

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Accepted report styles
pub const REPORT_STYLES: &[&str] = &["legacy", "well-formed"];

/// Destination names that are not file paths
pub const STREAM_DESTINATIONS: &[&str] = &["", "default", "stdout", "stderr"];

/// Accepted console summary formats
pub const SUMMARY_FORMATS: &[&str] = &["text", "json", "none"];

/// Contents of one settings file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Report output settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ReportSection>,

    /// Console summary settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub console: Option<ConsoleSection>,
}

/// `[report]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ReportSection {
    /// Report destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    /// Report markup style
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// `[console]` section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSection {
    /// Print one line per test case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,

    /// Colored console output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,

    /// Summary format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl Settings {
    /// Load settings from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate enumerated values
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(style) = self.report.as_ref().and_then(|r| r.style.as_deref()) {
            validate_choice("report.style", style, REPORT_STYLES)?;
        }
        if let Some(summary) = self.console.as_ref().and_then(|c| c.summary.as_deref()) {
            validate_choice("console.summary", summary, SUMMARY_FORMATS)?;
        }
        Ok(())
    }

    /// Merge another settings value into this one.
    /// Other settings take precedence field by field for non-None values.
    pub fn merge(&mut self, other: &Settings) {
        if let Some(other_report) = &other.report {
            let report = self.report.get_or_insert_with(Default::default);
            if other_report.destination.is_some() {
                report.destination = other_report.destination.clone();
            }
            if other_report.style.is_some() {
                report.style = other_report.style.clone();
            }
        }

        if let Some(other_console) = &other.console {
            let console = self.console.get_or_insert_with(Default::default);
            if other_console.verbose.is_some() {
                console.verbose = other_console.verbose;
            }
            if other_console.color.is_some() {
                console.color = other_console.color;
            }
            if other_console.summary.is_some() {
                console.summary = other_console.summary.clone();
            }
        }
    }

    /// Make a relative report file path relative to `base` instead of the
    /// working directory. Stream names and absolute paths are kept.
    pub fn anchor_destination(&mut self, base: &Path) {
        let Some(destination) = self.report.as_mut().and_then(|r| r.destination.as_mut()) else {
            return;
        };
        if STREAM_DESTINATIONS.contains(&destination.as_str()) || Path::new(destination).is_absolute() {
            return;
        }
        *destination = base.join(&*destination).to_string_lossy().into_owned();
    }

    pub fn report_mut(&mut self) -> &mut ReportSection {
        self.report.get_or_insert_with(Default::default)
    }

    pub fn console_mut(&mut self) -> &mut ConsoleSection {
        self.console.get_or_insert_with(Default::default)
    }
}

/// Reject a value that is not one of `choices`
pub(crate) fn validate_choice(field: &str, value: &str, choices: &[&str]) -> ConfigResult<()> {
    if !choices.contains(&value) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: format!("must be one of {}, got '{}'", choices.join(", "), value),
        });
    }
    Ok(())
}
