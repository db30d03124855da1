// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Murmur feedback pipeline.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Murmur configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// Every section has defaults, but `email.source_address` and
/// `email.admin_address` must be supplied for validation to pass.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MurmurConfig {
    /// Service identity and logging.
    #[serde(default)]
    pub service: ServiceConfig,

    /// Record store settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Reference queue settings.
    #[serde(default)]
    pub queue: QueueConfig,

    /// Admin alert delivery settings.
    #[serde(default)]
    pub email: EmailConfig,

    /// HTTP gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Batch consumer settings.
    #[serde(default)]
    pub processor: ProcessorConfig,
}

impl MurmurConfig {
    /// Returns a copy safe to print, with credentials replaced.
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.email.smtp_password.is_some() {
            copy.email.smtp_password = Some("[redacted]".to_string());
        }
        copy
    }
}

/// Service identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceConfig {
    /// Display name used in logs.
    #[serde(default = "default_service_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            log_level: default_log_level(),
        }
    }
}

fn default_service_name() -> String {
    "murmur".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Record store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Table holding feedback records.
    #[serde(default = "default_table_name")]
    pub table_name: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            table_name: default_table_name(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    "murmur.db".to_string()
}

fn default_table_name() -> String {
    "feedback".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Reference queue configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct QueueConfig {
    /// Name of the queue references are sent to. `None` or blank disables
    /// dispatch: submissions are still stored but never processed.
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Maximum messages claimed per batch.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Seconds a received message stays hidden before redelivery.
    #[serde(default = "default_visibility_timeout_secs")]
    pub visibility_timeout_secs: u64,

    /// Deliveries before a message is moved to the dead-letter state.
    #[serde(default = "default_max_receives")]
    pub max_receives: u32,

    /// Sleep between polls when the queue is empty.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl QueueConfig {
    /// The configured endpoint, treating a blank value as absent.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            batch_size: default_batch_size(),
            visibility_timeout_secs: default_visibility_timeout_secs(),
            max_receives: default_max_receives(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

fn default_batch_size() -> usize {
    10
}

fn default_visibility_timeout_secs() -> u64 {
    30
}

fn default_max_receives() -> u32 {
    5
}

fn default_poll_interval_ms() -> u64 {
    1000
}

/// How alerts leave the process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransport {
    /// Deliver through an SMTP relay.
    #[default]
    Smtp,
    /// Write alerts to the log only (local development).
    Log,
}

/// TLS mode for the SMTP connection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TlsMode {
    /// Plain connection upgraded with STARTTLS.
    #[default]
    Starttls,
    /// Implicit TLS (SMTPS).
    Tls,
    /// No encryption. Only for local relays.
    #[serde(rename = "none")]
    Plain,
}

/// Admin alert delivery configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EmailConfig {
    #[serde(default)]
    pub transport: EmailTransport,

    /// Sender address of alerts. Required.
    #[serde(default)]
    pub source_address: String,

    /// Administrator address alerts are sent to. Required.
    #[serde(default)]
    pub admin_address: String,

    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default)]
    pub smtp_username: Option<String>,

    #[serde(default)]
    pub smtp_password: Option<String>,

    #[serde(default)]
    pub tls: TlsMode,

    /// SMTP command timeout in seconds.
    #[serde(default = "default_email_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("transport", &self.transport)
            .field("source_address", &self.source_address)
            .field("admin_address", &self.admin_address)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field(
                "smtp_password",
                &self.smtp_password.as_ref().map(|_| "[redacted]"),
            )
            .field("tls", &self.tls)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            transport: EmailTransport::default(),
            source_address: String::new(),
            admin_address: String::new(),
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: None,
            smtp_password: None,
            tls: TlsMode::default(),
            timeout_secs: default_email_timeout_secs(),
        }
    }
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    587
}

fn default_email_timeout_secs() -> u64 {
    10
}

/// HTTP gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_gateway_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_gateway_port")]
    pub port: u16,

    /// Request header carrying the caller identity asserted by the
    /// fronting proxy or authorizer.
    #[serde(default = "default_identity_header")]
    pub identity_header: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_gateway_host(),
            port: default_gateway_port(),
            identity_header: default_identity_header(),
        }
    }
}

fn default_gateway_host() -> String {
    "127.0.0.1".to_string()
}

fn default_gateway_port() -> u16 {
    8080
}

fn default_identity_header() -> String {
    "x-user-id".to_string()
}

/// Batch consumer configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessorConfig {
    /// Run the consumer loop inside `murmur serve`.
    #[serde(default = "default_processor_enabled")]
    pub enabled: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            enabled: default_processor_enabled(),
        }
    }
}

fn default_processor_enabled() -> bool {
    true
}
