// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Murmur configuration system.

use std::io::Write;

use murmur_config::diagnostic::ConfigError;
use murmur_config::model::{EmailTransport, TlsMode};
use murmur_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

const MINIMAL: &str = r#"
[email]
source_address = "murmur@example.com"
admin_address = "admin@example.com"
"#;

#[test]
fn full_toml_deserializes_into_murmur_config() {
    let toml = r#"
[service]
name = "murmur-test"
log_level = "debug"

[storage]
database_path = "/tmp/murmur-test.db"
table_name = "feedback_v2"
wal_mode = false

[queue]
endpoint = "critical-feedback"
batch_size = 25
visibility_timeout_secs = 60
max_receives = 3
poll_interval_ms = 250

[email]
transport = "log"
source_address = "murmur@example.com"
admin_address = "admin@example.com"
smtp_host = "smtp.example.com"
smtp_port = 465
smtp_username = "murmur"
smtp_password = "hunter2"
tls = "tls"
timeout_secs = 5

[gateway]
host = "0.0.0.0"
port = 9090
identity_header = "x-forwarded-user"

[processor]
enabled = false
"#;

    let config = load_and_validate_str(toml).expect("valid config");
    assert_eq!(config.service.name, "murmur-test");
    assert_eq!(config.service.log_level, "debug");
    assert_eq!(config.storage.database_path, "/tmp/murmur-test.db");
    assert_eq!(config.storage.table_name, "feedback_v2");
    assert!(!config.storage.wal_mode);
    assert_eq!(config.queue.endpoint(), Some("critical-feedback"));
    assert_eq!(config.queue.batch_size, 25);
    assert_eq!(config.queue.visibility_timeout_secs, 60);
    assert_eq!(config.queue.max_receives, 3);
    assert_eq!(config.queue.poll_interval_ms, 250);
    assert_eq!(config.email.transport, EmailTransport::Log);
    assert_eq!(config.email.smtp_port, 465);
    assert_eq!(config.email.tls, TlsMode::Tls);
    assert_eq!(config.email.timeout_secs, 5);
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9090);
    assert_eq!(config.gateway.identity_header, "x-forwarded-user");
    assert!(!config.processor.enabled);
}

#[test]
fn missing_sections_use_defaults() {
    let config = load_and_validate_str(MINIMAL).expect("minimal config is valid");
    assert_eq!(config.service.name, "murmur");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.storage.database_path, "murmur.db");
    assert_eq!(config.storage.table_name, "feedback");
    assert!(config.storage.wal_mode);
    assert!(config.queue.endpoint().is_none());
    assert_eq!(config.queue.batch_size, 10);
    assert_eq!(config.queue.visibility_timeout_secs, 30);
    assert_eq!(config.queue.max_receives, 5);
    assert_eq!(config.email.transport, EmailTransport::Smtp);
    assert_eq!(config.email.smtp_host, "localhost");
    assert_eq!(config.email.smtp_port, 587);
    assert_eq!(config.email.tls, TlsMode::Starttls);
    assert_eq!(config.gateway.port, 8080);
    assert_eq!(config.gateway.identity_header, "x-user-id");
    assert!(config.processor.enabled);
}

#[test]
fn blank_queue_endpoint_counts_as_absent() {
    let toml = format!("{MINIMAL}\n[queue]\nendpoint = \"   \"\n");
    let config = load_and_validate_str(&toml).unwrap();
    assert!(config.queue.endpoint.is_some());
    assert!(config.queue.endpoint().is_none());
}

#[test]
fn tls_none_parses_to_plain() {
    let toml = MINIMAL.replace("[email]", "[email]\ntls = \"none\"");
    let config = load_config_from_str(&toml).unwrap();
    assert_eq!(config.email.tls, TlsMode::Plain);
}

#[test]
fn empty_config_fails_on_required_addresses() {
    let errors = load_and_validate_str("").unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .all(|e| matches!(e, ConfigError::Validation { .. })));
}

#[test]
fn unknown_key_in_queue_suggests_correction() {
    let toml = format!("{MINIMAL}\n[queue]\nendpont = \"x\"\n");
    let errors = load_and_validate_str(&toml).unwrap_err();
    let found = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, span, .. }
            if key == "endpont" && suggestion.as_deref() == Some("endpoint") && span.is_some())
    });
    assert!(found, "expected UnknownKey with suggestion, got {errors:?}");
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let toml = format!("{MINIMAL}\n[telemetry]\nenabled = true\n");
    let errors = load_and_validate_str(&toml).unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::UnknownKey { key, .. } if key == "telemetry")),
        "got {errors:?}"
    );
}

#[test]
fn wrong_type_reports_key_and_expectation() {
    let toml = format!("{MINIMAL}\n[gateway]\nport = \"eighty\"\n");
    let errors = load_and_validate_str(&toml).unwrap_err();
    let msg = errors
        .iter()
        .find_map(|e| match e {
            ConfigError::InvalidType { key, .. } => Some(key.clone()),
            _ => None,
        })
        .expect("invalid type error");
    assert_eq!(msg, "gateway.port");
}

#[test]
fn validation_errors_are_collected_together() {
    let toml = r#"
[storage]
table_name = "drop table"

[queue]
batch_size = 0
max_receives = 0

[email]
source_address = "nope"
admin_address = "admin@example.com"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 4, "{errors:?}");
}

#[test]
fn explicit_path_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{MINIMAL}\n[gateway]\nport = 9191").unwrap();
    let config = load_and_validate_path(file.path()).unwrap();
    assert_eq!(config.gateway.port, 9191);
}

#[test]
fn redacted_masks_password_only() {
    let toml = MINIMAL.replace(
        "[email]",
        "[email]\nsmtp_username = \"u\"\nsmtp_password = \"hunter2\"",
    );
    let config = load_and_validate_str(&toml).unwrap();
    let redacted = config.redacted();
    assert_eq!(redacted.email.smtp_password.as_deref(), Some("[redacted]"));
    assert_eq!(redacted.email.smtp_username.as_deref(), Some("u"));
    assert!(!format!("{:?}", config.email).contains("hunter2"));
}

#[test]
fn config_error_renders_as_diagnostic() {
    use miette::Diagnostic;
    let errors = load_and_validate_str("").unwrap_err();
    let code = errors[0].code().map(|c| c.to_string());
    assert_eq!(code.as_deref(), Some("murmur::config::validation"));
}
