//! Configuration Loader
//!
//! Handles loading and merging settings from multiple sources with proper precedence.

use crate::settings::{validate_choice, Settings, REPORT_STYLES, SUMMARY_FORMATS};
use crate::{ConfigError, ConfigResult};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project settings file
pub const PROJECT_FILE: &str = "tally.toml";

/// Configuration loader
///
/// Loads settings from multiple sources and merges them with proper precedence:
/// 1. Global config (~/.tally/config.toml) - lowest priority
/// 2. Project config (./tally.toml) - overrides global
/// 3. Environment variables (TALLY_*) - overrides project
/// 4. CLI flags - highest priority (handled by caller)
pub struct ConfigLoader {
    /// Cached global config path
    global_config_path: Option<PathBuf>,
}

/// Merged configuration result
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Effective settings after merging
    pub settings: Settings,

    /// Project root directory (where tally.toml was found)
    pub project_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self {
            global_config_path: None,
        }
    }

    /// Read global settings from `path` instead of ~/.tally/config.toml
    pub fn with_global_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find tally.toml, then merges it over the
    /// global settings and applies environment overrides.
    pub fn load_from_directory(&mut self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project) = self.find_project_settings(start_dir)?;
        self.assemble(project_root, project)
    }

    /// Load configuration from a specific project settings file
    pub fn load_from_file(&mut self, config_path: &Path) -> ConfigResult<Config> {
        let project = Settings::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        self.assemble(project_root, project)
    }

    fn assemble(
        &mut self,
        project_root: Option<PathBuf>,
        mut project: Settings,
    ) -> ConfigResult<Config> {
        if let Some(root) = &project_root {
            project.anchor_destination(root);
        }

        // Global config is optional; an unreadable home directory is not fatal
        let mut settings = self.load_global_settings().unwrap_or_default();
        settings.merge(&project);
        self.apply_env_overrides(&mut settings)?;

        Ok(Config {
            settings,
            project_root,
        })
    }

    /// Find project settings by walking up directory tree
    fn find_project_settings(&self, start_dir: &Path) -> ConfigResult<(Option<PathBuf>, Settings)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(PROJECT_FILE);

            if config_path.exists() {
                let settings = Settings::load_from_file(&config_path)?;
                return Ok((Some(current), settings));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, Settings::default())),
            }
        }
    }

    /// Load global settings from ~/.tally/config.toml
    fn load_global_settings(&mut self) -> ConfigResult<Settings> {
        let path = match &self.global_config_path {
            Some(path) => path.clone(),
            None => {
                let path = Self::global_config_dir()?.join("config.toml");
                self.global_config_path = Some(path.clone());
                path
            }
        };

        if !path.exists() {
            return Ok(Settings::default());
        }

        Settings::load_from_file(&path)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&self, settings: &mut Settings) -> ConfigResult<()> {
        if let Ok(destination) = env::var("TALLY_REPORT") {
            settings.report_mut().destination = Some(destination);
        }

        if let Ok(style) = env::var("TALLY_REPORT_STYLE") {
            validate_choice("TALLY_REPORT_STYLE", &style, REPORT_STYLES)?;
            settings.report_mut().style = Some(style);
        }

        if let Ok(verbose) = env::var("TALLY_VERBOSE") {
            settings.console_mut().verbose = Some(is_truthy(&verbose));
        }

        if let Ok(summary) = env::var("TALLY_SUMMARY") {
            validate_choice("TALLY_SUMMARY", &summary, SUMMARY_FORMATS)?;
            settings.console_mut().summary = Some(summary);
        }

        if env::var_os("NO_COLOR").is_some() || env::var_os("TALLY_NO_COLOR").is_some() {
            settings.console_mut().color = Some(false);
        }

        Ok(())
    }

    /// Get the global configuration directory (~/.tally)
    pub fn global_config_dir() -> ConfigResult<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::HomeNotFound)?;
        Ok(home.join(".tally"))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}

impl Config {
    /// Report destination name; `"default"` when unset
    pub fn report_destination(&self) -> &str {
        self.settings
            .report
            .as_ref()
            .and_then(|r| r.destination.as_deref())
            .unwrap_or("default")
    }

    /// Report style name; `"legacy"` when unset
    pub fn report_style(&self) -> &str {
        self.settings
            .report
            .as_ref()
            .and_then(|r| r.style.as_deref())
            .unwrap_or("legacy")
    }

    pub fn verbose(&self) -> bool {
        self.console_flag(|c| c.verbose).unwrap_or(false)
    }

    pub fn color(&self) -> bool {
        self.console_flag(|c| c.color).unwrap_or(true)
    }

    /// Summary format name; `"text"` when unset
    pub fn summary(&self) -> &str {
        self.settings
            .console
            .as_ref()
            .and_then(|c| c.summary.as_deref())
            .unwrap_or("text")
    }

    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if a tally.toml was found
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    fn console_flag(&self, get: impl Fn(&crate::ConsoleSection) -> Option<bool>) -> Option<bool> {
        self.settings.console.as_ref().and_then(get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn loader(home: &TempDir) -> ConfigLoader {
        ConfigLoader::new().with_global_config_path(home.path().join("config.toml"))
    }

    fn clear_env() {
        for var in [
            "TALLY_REPORT",
            "TALLY_REPORT_STYLE",
            "TALLY_VERBOSE",
            "TALLY_SUMMARY",
            "TALLY_NO_COLOR",
            "NO_COLOR",
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_without_any_file() {
        clear_env();
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        let config = loader(&home).load_from_directory(project.path()).unwrap();

        assert!(!config.is_project());
        assert_eq!(config.report_destination(), "default");
        assert_eq!(config.report_style(), "legacy");
        assert!(!config.verbose());
        assert!(config.color());
        assert_eq!(config.summary(), "text");
    }

    #[test]
    #[serial]
    fn test_project_overrides_global() {
        clear_env();
        let home = TempDir::new().unwrap();
        fs::write(
            home.path().join("config.toml"),
            "[report]\ndestination = \"global.xml\"\nstyle = \"well-formed\"\n",
        )
        .unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(PROJECT_FILE),
            "[report]\ndestination = \"project.xml\"\n",
        )
        .unwrap();

        let config = loader(&home).load_from_directory(project.path()).unwrap();

        let expected = project.path().join("project.xml");
        assert_eq!(config.report_destination(), expected.to_str().unwrap());
        assert_eq!(config.report_style(), "well-formed");
        assert_eq!(config.project_root(), Some(project.path()));
    }

    #[test]
    #[serial]
    fn test_project_destination_relative_to_root() {
        clear_env();
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(PROJECT_FILE),
            "[report]\ndestination = \"out/report.xml\"\n",
        )
        .unwrap();
        let nested = project.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let config = loader(&home).load_from_directory(&nested).unwrap();

        let expected = project.path().join("out/report.xml");
        assert_eq!(config.report_destination(), expected.to_str().unwrap());
    }

    #[test]
    #[serial]
    fn test_env_destination_kept_verbatim() {
        clear_env();
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(PROJECT_FILE),
            "[report]\ndestination = \"project.xml\"\n",
        )
        .unwrap();

        env::set_var("TALLY_REPORT", "env.xml");
        let config = loader(&home).load_from_directory(project.path()).unwrap();
        clear_env();

        assert_eq!(config.report_destination(), "env.xml");
    }

    #[test]
    #[serial]
    fn test_env_overrides_project() {
        clear_env();
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(PROJECT_FILE),
            "[report]\nstyle = \"legacy\"\n[console]\nverbose = false\n",
        )
        .unwrap();

        env::set_var("TALLY_REPORT_STYLE", "well-formed");
        env::set_var("TALLY_VERBOSE", "yes");
        env::set_var("NO_COLOR", "1");
        let config = loader(&home).load_from_directory(project.path()).unwrap();
        clear_env();

        assert_eq!(config.report_style(), "well-formed");
        assert!(config.verbose());
        assert!(!config.color());
    }

    #[test]
    #[serial]
    fn test_invalid_env_style_rejected() {
        clear_env();
        let home = TempDir::new().unwrap();
        let project = TempDir::new().unwrap();

        env::set_var("TALLY_REPORT_STYLE", "fancy");
        let result = loader(&home).load_from_directory(project.path());
        clear_env();

        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_truthy_values() {
        assert!(is_truthy("TRUE"));
        assert!(is_truthy("1"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("off"));
    }
}
