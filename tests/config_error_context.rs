//! Tests for config error context preservation
//!
//! Verifies that configuration errors keep the underlying io/toml error as
//! their source and name the offending file.

use std::error::Error;
use std::fs;
use std::str::FromStr;
use tempfile::TempDir;
use ticket_triage::config::Config;
use ticket_triage::error::AppError;

#[test]
fn test_config_file_read_error_preserves_io_error() {
    let err = Config::from_file("/nonexistent/path/to/config.toml")
        .expect_err("reading a missing file should fail");

    assert!(
        err.to_string().contains("/nonexistent/path/to/config.toml"),
        "Error should include the file path, got: {}",
        err
    );

    let source = err.source().expect("Should have source error");
    assert!(
        source.is::<std::io::Error>(),
        "Source error should be io::Error, got: {:?}",
        source
    );
}

#[test]
fn test_config_parse_error_preserves_toml_error() {
    let invalid_toml = r#"
this is [[[[ not valid toml
"#;

    let err = Config::from_str(invalid_toml).expect_err("invalid TOML should fail");

    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
    let source = err.source().expect("Should have source error");
    assert!(source.is::<toml::de::Error>());
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn test_wrong_field_type_is_parse_error() {
    let err = Config::from_str("[batch]\nconcurrency = \"four\"\n")
        .expect_err("string concurrency should fail");
    assert!(matches!(err, AppError::ConfigParseFailed { .. }));
}

#[test]
fn test_validation_failure_names_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[helpdesk]\nrequest_timeout_seconds = 0\n").expect("write");

    let err = Config::from_file(&config_path).expect_err("zero timeout should fail");

    match err {
        AppError::ConfigValidationFailed { ref path, ref reason } => {
            assert!(path.ends_with("config.toml"));
            assert!(
                reason.contains("helpdesk.request_timeout_seconds"),
                "reason should name the field, got: {}",
                reason
            );
        }
        other => panic!("expected ConfigValidationFailed, got {:?}", other),
    }
}

#[test]
fn test_duplicate_form_mapping_is_rejected() {
    let toml = r#"
[[forms]]
form_id = "1"
subdomain = "a.example.com"
article_id = "10"

[[forms]]
form_id = "1"
subdomain = "b.example.com"
article_id = "20"
"#;

    let err = Config::from_str(toml).expect_err("duplicate form id should fail");
    assert!(err.to_string().contains("form_id '1'"));
}

#[test]
fn test_non_http_url_is_rejected() {
    let err = Config::from_str("[advisory]\nbase_url = \"ftp://api.example.com\"\n")
        .expect_err("ftp url should fail");
    assert!(err.to_string().contains("advisory.base_url"));
}
