//! Loading policy files from disk.

use std::io::Write;
use std::time::Duration;

use folio_runtime::{ConfigError, FolioConfig};
use pretty_assertions::assert_eq;

fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("create temp file");
    file.write_all(body.as_bytes()).expect("write temp file");
    file
}

#[test]
fn partial_toml_keeps_remaining_defaults() {
    let file = write_temp(
        ".toml",
        r#"
[scroll]
idle_timeout_ms = 200

[boot]
storage_key = "portfolio.booted"
ceiling_margin_ms = 1000
"#,
    );
    let config = FolioConfig::from_toml_file(file.path()).expect("valid toml");

    assert_eq!(config.scroll.idle_timeout_ms, 200);
    assert_eq!(config.scroll.bottom_slack_px, 50.0);
    assert_eq!(config.boot.storage_key, "portfolio.booted");

    let boot = config.boot_config();
    assert_eq!(boot.ceiling_margin, Duration::from_millis(1000));
    assert_eq!(boot.script.total(), Duration::from_millis(3700));
    assert_eq!(config.reveal, FolioConfig::default().reveal);
}

#[test]
fn toml_can_replace_the_boot_script() {
    let file = write_temp(
        ".toml",
        r#"
[boot]
settle_ms = 200

[[boot.steps]]
delay_ms = 100
tag = "SYSTEM"
message = "Booting"

[[boot.steps]]
delay_ms = 50
shows_cursor = true
"#,
    );
    let config = FolioConfig::from_toml_file(file.path()).expect("valid toml");
    let script = config.boot_config().script;
    assert_eq!(script.stage_count(), 2);
    assert_eq!(script.total(), Duration::from_millis(350));
    assert!(script.steps()[1].shows_cursor);
}

#[test]
fn json_file_loads() {
    let file = write_temp(
        ".json",
        r#"{ "nav": { "scrolled_threshold_px": 80.0 }, "reveal": { "threshold": 0.25 } }"#,
    );
    let config = FolioConfig::from_json_file(file.path()).expect("valid json");
    assert_eq!(config.nav_config().scrolled_threshold, 80.0);
    assert_eq!(config.reveal_config().threshold, 0.25);
    assert_eq!(config.nav_config().spy_offset, -70.0);
}

#[test]
fn invalid_values_are_collected() {
    let file = write_temp(
        ".toml",
        r#"
[scroll]
idle_timeout_ms = 0

[reveal]
threshold = 1.5
"#,
    );
    match FolioConfig::from_toml_file(file.path()) {
        Err(ConfigError::Validation(errors)) => {
            assert_eq!(errors.len(), 2);
            assert!(errors[0].contains("idle_timeout_ms"));
            assert!(errors[1].contains("reveal.threshold"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn malformed_files_report_parse_errors() {
    let toml = write_temp(".toml", "[scroll\nidle_timeout_ms = ");
    assert!(matches!(
        FolioConfig::from_toml_file(toml.path()),
        Err(ConfigError::Toml(_))
    ));

    let json = write_temp(".json", "{ \"scroll\": ");
    assert!(matches!(
        FolioConfig::from_json_file(json.path()),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().expect("temp dir");
    let err = FolioConfig::from_toml_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("I/O error"));
}
