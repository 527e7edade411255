// ============================
// tests/unit/config_tests.rs
// ============================
//! Tests for layered configuration loading

use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use warden_backend_lib::config::{LogFormat, Settings};

const SECRET: &str = "file-secret-file-secret-file-secret!";

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("Failed to create temp config");
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults() {
    let settings = Settings::default();
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.server.port, 8080);
    assert_eq!(settings.rate_limit.window_secs, 60);
    assert_eq!(settings.rate_limit.max_requests, 30);
    assert_eq!(settings.auth_rate_limit.max_requests, 10);
    assert_eq!(settings.auth.access_ttl_secs, 900);
    assert_eq!(settings.auth.session_access_ttl_secs, 1800);
    assert_eq!(settings.auth.refresh_ttl_secs, 7 * 24 * 60 * 60);
    assert_eq!(settings.logging.format, LogFormat::Pretty);
}

#[test]
fn test_missing_secret_is_rejected() {
    let result = Settings::load_with(Path::new("does/not/exist.toml"), "WARDEN_TEST_NOSECRET");
    assert!(result.is_err());
}

#[test]
fn test_load_from_file() {
    let file = write_config(&format!(
        r#"
[server]
port = 9000

[auth]
secret = "{SECRET}"
session_access_ttl_secs = 600

[rate_limit]
max_requests = 5

[password]
min_length = 8
require_digit = true
hash_log_n = 10

[logging]
format = "json"
"#
    ));

    let settings = Settings::load_with(file.path(), "WARDEN_TEST_FILE").unwrap();
    assert_eq!(settings.server.port, 9000);
    assert_eq!(settings.server.host, "127.0.0.1");
    assert_eq!(settings.auth.secret, SECRET);
    assert_eq!(settings.auth.session_access_ttl_secs, 600);
    assert_eq!(settings.auth.access_ttl_secs, 900);
    assert_eq!(settings.rate_limit.max_requests, 5);
    assert_eq!(settings.rate_limit.window_secs, 60);
    assert_eq!(settings.password.requirements.min_length, 8);
    assert!(settings.password.requirements.require_digit);
    assert_eq!(settings.password.hash_log_n, 10);
    assert_eq!(settings.logging.format, LogFormat::Json);
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(&format!(
        r#"
[server]
port = 9000

[auth]
secret = "{SECRET}"
"#
    ));

    std::env::set_var("WARDEN_TEST_ENV__SERVER__PORT", "7000");
    std::env::set_var("WARDEN_TEST_ENV__AUTH_RATE_LIMIT__MAX_REQUESTS", "3");
    let settings = Settings::load_with(file.path(), "WARDEN_TEST_ENV").unwrap();
    std::env::remove_var("WARDEN_TEST_ENV__SERVER__PORT");
    std::env::remove_var("WARDEN_TEST_ENV__AUTH_RATE_LIMIT__MAX_REQUESTS");

    assert_eq!(settings.server.port, 7000);
    assert_eq!(settings.auth_rate_limit.max_requests, 3);
    assert_eq!(settings.bind_addr().unwrap().port(), 7000);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let file = write_config(&format!(
        r#"
[auth]
secret = "{SECRET}"

[rate_limit]
max_requests = 0
"#
    ));
    assert!(Settings::load_with(file.path(), "WARDEN_TEST_INVALID").is_err());
}

#[test]
fn test_secret_is_redacted_in_debug() {
    let mut settings = Settings::default();
    settings.auth.secret = SECRET.to_string();
    let rendered = format!("{settings:?}");
    assert!(!rendered.contains(SECRET));
}

#[test]
fn test_out_of_range_lifetimes_are_rejected() {
    let file = write_config(&format!(
        r#"
[auth]
secret = "{SECRET}"
refresh_ttl_secs = 10000000000000
"#
    ));
    assert!(Settings::load_with(file.path(), "WARDEN_TEST_TTL_RANGE").is_err());

    let file = write_config(&format!(
        r#"
[auth]
secret = "{SECRET}"

[rate_limit]
window_secs = 10000000000000
"#
    ));
    assert!(Settings::load_with(file.path(), "WARDEN_TEST_WINDOW_RANGE").is_err());
}
