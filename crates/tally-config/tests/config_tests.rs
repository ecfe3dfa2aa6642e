//! Configuration loading and precedence tests

use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::Path;
use tally_config::{ConfigError, ConfigLoader, Settings};
use tempfile::TempDir;

fn create_config_file(dir: &Path, content: &str) -> std::path::PathBuf {
    let config_path = dir.join("tally.toml");
    fs::write(&config_path, content).unwrap();
    config_path
}

fn isolated_loader(home: &TempDir) -> ConfigLoader {
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

// ============================================================================
// Config Loading Tests
// ============================================================================

#[test]
#[serial]
fn test_load_from_subdirectory_finds_parent() {
    clear_env();
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(
        temp_dir.path(),
        r#"
[report]
destination = "reports/out.xml"
"#,
    );

    let nested = temp_dir.path().join("sub1").join("sub2");
    fs::create_dir_all(&nested).unwrap();

    let config = isolated_loader(&home).load_from_directory(&nested).unwrap();

    let expected = temp_dir.path().join("reports/out.xml");
    assert_eq!(config.report_destination(), expected.to_str().unwrap());
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
#[serial]
fn test_load_with_empty_config() {
    clear_env();
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "");

    let config = isolated_loader(&home)
        .load_from_directory(temp_dir.path())
        .unwrap();

    // Empty config is valid (all fields optional)
    assert!(config.is_project());
    assert_eq!(config.report_style(), "legacy");
}

#[test]
#[serial]
fn test_load_from_explicit_file() {
    clear_env();
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(
        temp_dir.path(),
        r#"
[console]
summary = "json"
color = false
"#,
    );

    let config = isolated_loader(&home).load_from_file(&path).unwrap();

    assert_eq!(config.summary(), "json");
    assert!(!config.color());
    assert_eq!(config.project_root(), Some(temp_dir.path()));
}

#[test]
fn test_missing_explicit_file() {
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();

    let result = isolated_loader(&home).load_from_file(&temp_dir.path().join("tally.toml"));

    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_malformed_toml_names_file() {
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), "[report\ndestination = ");

    let err = isolated_loader(&home).load_from_file(&path).unwrap_err();

    match err {
        ConfigError::TomlParseError { file, .. } => assert_eq!(file, path),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Validation Tests
// ============================================================================

#[rstest]
#[case("[report]\nstyle = \"xml\"\n", "report.style")]
#[case("[console]\nsummary = \"yaml\"\n", "console.summary")]
fn test_invalid_choices(#[case] content: &str, #[case] field: &str) {
    let temp_dir = TempDir::new().unwrap();
    let path = create_config_file(temp_dir.path(), content);

    let err = Settings::load_from_file(&path).unwrap_err();

    match err {
        ConfigError::InvalidValue { field: got, .. } => assert_eq!(got, field),
        other => panic!("unexpected error: {other}"),
    }
}

// ============================================================================
// Precedence Tests
// ============================================================================

#[test]
#[serial]
fn test_env_report_destination_wins() {
    clear_env();
    let home = TempDir::new().unwrap();
    let temp_dir = TempDir::new().unwrap();
    create_config_file(temp_dir.path(), "[report]\ndestination = \"file.xml\"\n");

    env::set_var("TALLY_REPORT", "stderr");
    let config = isolated_loader(&home)
        .load_from_directory(temp_dir.path())
        .unwrap();
    clear_env();

    assert_eq!(config.report_destination(), "stderr");
}

#[test]
#[serial]
fn test_global_settings_apply_without_project() {
    clear_env();
    let home = TempDir::new().unwrap();
    fs::write(
        home.path().join("config.toml"),
        "[console]\nverbose = true\nsummary = \"none\"\n",
    )
    .unwrap();
    let temp_dir = TempDir::new().unwrap();

    let config = isolated_loader(&home)
        .load_from_directory(temp_dir.path())
        .unwrap();

    assert!(!config.is_project());
    assert!(config.verbose());
    assert_eq!(config.summary(), "none");
}
