//! Tally Configuration System
//!
//! Loads the settings that drive a harness run:
//! - Project configuration (tally.toml)
//! - Global user configuration (~/.tally/config.toml)
//! - Environment variables (TALLY_*)
//!
//! # Configuration Hierarchy
//!
//! Sources are merged in the following order (later overrides earlier):
//! 1. Global config (~/.tally/config.toml)
//! 2. Project config (./tally.toml, searched upwards)
//! 3. Environment variables (TALLY_REPORT, TALLY_REPORT_STYLE, TALLY_VERBOSE,
//!    TALLY_SUMMARY, NO_COLOR)
//! 4. CLI flags (applied by the caller)
//!
//! # Example
//!
//! ```no_run
//! use tally_config::ConfigLoader;
//! use std::path::Path;
//!
//! let mut loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("report goes to {}", config.report_destination());
//! ```

pub mod loader;
pub mod settings;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Home directory not found")]
    HomeNotFound,
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use loader::{Config, ConfigLoader};
pub use settings::{ConsoleSection, ReportSection, Settings};
