// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Checks the constraints serde cannot express: required addresses, value
//! ranges, and identifiers that end up inside SQL or HTTP headers.

use crate::diagnostic::ConfigError;
use crate::model::{EmailTransport, MurmurConfig};

/// Largest batch a consumer may claim in one receive.
pub const MAX_BATCH_SIZE: usize = 100;

/// Validate a deserialized configuration for semantic correctness.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MurmurConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::validation(
            "storage.database_path must not be empty",
        ));
    }

    if let Err(reason) = check_table_name(&config.storage.table_name) {
        errors.push(ConfigError::validation(format!("storage.table_name {reason}")));
    }

    for (key, value) in [
        ("email.source_address", &config.email.source_address),
        ("email.admin_address", &config.email.admin_address),
    ] {
        if value.trim().is_empty() {
            errors.push(ConfigError::validation(format!("{key} is required")));
        } else if !looks_like_address(value) {
            errors.push(ConfigError::validation(format!(
                "{key} `{value}` is not an email address"
            )));
        }
    }

    if config.email.transport == EmailTransport::Smtp && config.email.smtp_host.trim().is_empty() {
        errors.push(ConfigError::validation(
            "email.smtp_host must not be empty when transport is smtp",
        ));
    }

    if config.email.smtp_password.is_some() && config.email.smtp_username.is_none() {
        errors.push(ConfigError::validation(
            "email.smtp_password is set but email.smtp_username is missing",
        ));
    }

    if config.queue.batch_size == 0 || config.queue.batch_size > MAX_BATCH_SIZE {
        errors.push(ConfigError::validation(format!(
            "queue.batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
            config.queue.batch_size
        )));
    }

    if config.queue.visibility_timeout_secs == 0 {
        errors.push(ConfigError::validation(
            "queue.visibility_timeout_secs must be greater than 0",
        ));
    }

    if config.queue.max_receives == 0 {
        errors.push(ConfigError::validation(
            "queue.max_receives must be at least 1",
        ));
    }

    if config.gateway.host.trim().is_empty() {
        errors.push(ConfigError::validation("gateway.host must not be empty"));
    }

    if !is_header_name(&config.gateway.identity_header) {
        errors.push(ConfigError::validation(format!(
            "gateway.identity_header `{}` is not a valid HTTP header name",
            config.gateway.identity_header
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Tables created by migrations in the same database file.
pub const RESERVED_TABLE_NAMES: &[&str] = &["queue_messages", "refinery_schema_history"];

/// Check a feedback table name before it is quoted into SQL.
///
/// It must be a plain identifier and must not name a table Murmur or SQLite
/// already manages. Comparison is case-insensitive, as in SQLite.
pub fn check_table_name(name: &str) -> Result<(), String> {
    if !is_sql_identifier(name) {
        return Err(format!(
            "`{name}` must start with a letter or underscore and contain only ASCII letters, digits and underscores"
        ));
    }
    let lower = name.to_ascii_lowercase();
    if lower.starts_with("sqlite_") || RESERVED_TABLE_NAMES.contains(&lower.as_str()) {
        return Err(format!("`{name}` is reserved for internal tables"));
    }
    Ok(())
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// A loose `local@domain` check. Full parsing happens in the mail transport.
fn looks_like_address(value: &str) -> bool {
    let value = value.trim();
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    match value.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

/// RFC 7230 token characters.
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> MurmurConfig {
        let mut config = MurmurConfig::default();
        config.email.source_address = "murmur@example.com".into();
        config.email.admin_address = "admin@example.com".into();
        config
    }

    fn messages(config: &MurmurConfig) -> Vec<String> {
        match validate_config(config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn defaults_with_addresses_are_valid() {
        assert!(validate_config(&valid()).is_ok());
    }

    #[test]
    fn defaults_alone_miss_both_addresses() {
        let errors = messages(&MurmurConfig::default());
        assert_eq!(errors.len(), 2, "{errors:?}");
        assert!(errors[0].contains("email.source_address is required"));
        assert!(errors[1].contains("email.admin_address is required"));
    }

    #[test]
    fn rejects_address_without_domain() {
        let mut config = valid();
        config.email.admin_address = "admin@".into();
        let errors = messages(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("not an email address"));
    }

    #[test]
    fn rejects_table_name_that_is_not_an_identifier() {
        for bad in ["", "1feedback", "feed back", "feedback;drop", "fé"] {
            let mut config = valid();
            config.storage.table_name = bad.into();
            assert_eq!(messages(&config).len(), 1, "table name {bad:?}");
        }
        let mut config = valid();
        config.storage.table_name = "_feedback_v2".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_reserved_table_names() {
        for reserved in ["queue_messages", "QUEUE_MESSAGES", "refinery_schema_history", "sqlite_master"] {
            let mut config = valid();
            config.storage.table_name = reserved.into();
            let errors = messages(&config);
            assert_eq!(errors.len(), 1, "table name {reserved:?}");
            assert!(errors[0].contains("reserved"), "{errors:?}");
        }
    }

    #[test]
    fn batch_size_bounds() {
        for (size, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let mut config = valid();
            config.queue.batch_size = size;
            assert_eq!(validate_config(&config).is_ok(), ok, "batch_size {size}");
        }
    }

    #[test]
    fn zero_timeouts_and_receives_are_rejected() {
        let mut config = valid();
        config.queue.visibility_timeout_secs = 0;
        config.queue.max_receives = 0;
        assert_eq!(messages(&config).len(), 2);
    }

    #[test]
    fn password_without_username_is_rejected() {
        let mut config = valid();
        config.email.smtp_password = Some("secret".into());
        let errors = messages(&config);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("smtp_username"));
    }

    #[test]
    fn log_transport_does_not_need_smtp_host() {
        let mut config = valid();
        config.email.transport = EmailTransport::Log;
        config.email.smtp_host = String::new();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn identity_header_must_be_a_token() {
        let mut config = valid();
        config.gateway.identity_header = "x user".into();
        assert_eq!(messages(&config).len(), 1);
        config.gateway.identity_header = "X-Forwarded-User".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = MurmurConfig::default();
        config.storage.database_path = " ".into();
        config.gateway.host = String::new();
        assert_eq!(messages(&config).len(), 4);
    }
}
