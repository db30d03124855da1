// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SMTP notification channel built on lettre's async transport.

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use murmur_config::model::{EmailConfig, TlsMode};
use murmur_core::{
    AdapterType, Alert, DeliveryId, HealthStatus, MurmurError, NotificationChannel, PluginAdapter,
};

/// Upper bound on one relay probe from `health_check`.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

/// Sends alerts as plain-text email through an SMTP relay.
///
/// The delivery id of a sent alert is its `Message-ID` header.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    relay: String,
    health_timeout: Duration,
}

impl SmtpNotifier {
    /// Creates a notifier from the `[email]` section.
    ///
    /// Fails with a configuration error when the source address does not
    /// parse or the relay settings are unusable. No connection is made here.
    pub fn new(config: &EmailConfig) -> Result<Self, MurmurError> {
        let from: Mailbox = config.source_address.trim().parse().map_err(|e| {
            MurmurError::Config(format!(
                "email.source_address `{}` is invalid: {e}",
                config.source_address
            ))
        })?;

        let host = config.smtp_host.as_str();
        let builder = match config.tls {
            TlsMode::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host),
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host),
            TlsMode::Plain => Ok(AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)),
        }
        .map_err(|e| MurmurError::Config(format!("email.smtp_host `{host}` is unusable: {e}")))?;

        let timeout = Duration::from_secs(config.timeout_secs);
        let mut builder = builder.port(config.smtp_port).timeout(Some(timeout));
        if let Some(username) = &config.smtp_username {
            let password = config.smtp_password.clone().unwrap_or_default();
            builder = builder.credentials(Credentials::new(username.clone(), password));
        }

        Ok(Self {
            transport: builder.build(),
            from,
            relay: format!("{host}:{}", config.smtp_port),
            health_timeout: timeout.min(HEALTH_CHECK_TIMEOUT),
        })
    }

    /// Override how long `health_check` waits for the relay.
    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    /// Compose the email for an alert. Returns it with its Message-ID.
    pub fn compose(&self, alert: &Alert) -> Result<(Message, String), MurmurError> {
        let to: Mailbox = alert
            .destination
            .trim()
            .parse()
            .map_err(|e: lettre::address::AddressError| MurmurError::InvalidAddress {
                address: alert.destination.clone(),
                reason: e.to_string(),
            })?;

        let message_id = format!("<{}@{}>", uuid::Uuid::new_v4(), self.from.email.domain());
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(alert.subject.as_str())
            .message_id(Some(message_id.clone()))
            .header(ContentType::TEXT_PLAIN)
            .body(alert.body.clone())
            .map_err(|e| MurmurError::Notification {
                message: "failed to build alert email".to_string(),
                source: Some(Box::new(e)),
            })?;

        Ok((message, message_id))
    }
}

#[async_trait]
impl PluginAdapter for SmtpNotifier {
    fn name(&self) -> &str {
        "smtp"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Notification
    }

    // Bounded separately from the send timeout so `GET /health` stays fast.
    async fn health_check(&self) -> Result<HealthStatus, MurmurError> {
        let probe = tokio::time::timeout(self.health_timeout, self.transport.test_connection());
        match probe.await {
            Ok(Ok(true)) => Ok(HealthStatus::Healthy),
            Ok(Ok(false)) => Ok(HealthStatus::Degraded(format!(
                "SMTP relay {} did not accept NOOP",
                self.relay
            ))),
            Ok(Err(e)) => Ok(HealthStatus::Unhealthy(format!(
                "SMTP relay {} unreachable: {e}",
                self.relay
            ))),
            Err(_) => Ok(HealthStatus::Unhealthy(format!(
                "SMTP relay {} did not answer within {}ms",
                self.relay,
                self.health_timeout.as_millis()
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), MurmurError> {
        debug!("SMTP notifier shutting down");
        Ok(())
    }
}

#[async_trait]
impl NotificationChannel for SmtpNotifier {
    async fn send_alert(&self, alert: &Alert) -> Result<DeliveryId, MurmurError> {
        let (message, message_id) = self.compose(alert)?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| MurmurError::Notification {
                message: format!("SMTP delivery via {} failed", self.relay),
                source: Some(Box::new(e)),
            })?;

        info!(
            message_id = %message_id,
            to = %alert.destination,
            code = %response.code(),
            "alert email accepted by relay"
        );
        Ok(DeliveryId(message_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            source_address: "murmur@example.com".into(),
            admin_address: "admin@example.com".into(),
            smtp_host: "127.0.0.1".into(),
            // Nothing listens on port 9 locally; connects fail fast.
            smtp_port: 9,
            tls: TlsMode::Plain,
            timeout_secs: 2,
            ..EmailConfig::default()
        }
    }

    fn alert(destination: &str) -> Alert {
        Alert {
            destination: destination.into(),
            subject: "Critical feedback received".into(),
            body: "ID: fb-1\nScore: 0\n".into(),
        }
    }

    #[test]
    fn new_rejects_unparseable_source() {
        let mut config = config();
        config.source_address = "@@".into();
        assert!(matches!(SmtpNotifier::new(&config), Err(MurmurError::Config(_))));
    }

    #[test]
    fn compose_sets_headers_and_message_id() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let (message, id) = notifier.compose(&alert("admin@example.com")).unwrap();
        assert!(id.starts_with('<') && id.ends_with("@example.com>"));

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Critical feedback received"));
        assert!(raw.contains("From: murmur@example.com"));
        assert!(raw.contains("To: admin@example.com"));
        assert!(raw.contains(&format!("Message-ID: {id}")));
        assert!(raw.contains("ID: fb-1"));
    }

    #[tokio::test]
    async fn invalid_destination_is_reported_without_sending() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let err = notifier.send_alert(&alert("not-an-address")).await.unwrap_err();
        assert!(matches!(err, MurmurError::InvalidAddress { ref address, .. } if address == "not-an-address"));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn unreachable_relay_is_transient_notification_error() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        let err = notifier.send_alert(&alert("admin@example.com")).await.unwrap_err();
        assert!(matches!(err, MurmurError::Notification { .. }));
        assert!(err.is_transient());
    }

    #[test]
    fn health_timeout_is_capped_below_send_timeout() {
        let mut config = config();
        config.timeout_secs = 30;
        assert_eq!(SmtpNotifier::new(&config).unwrap().health_timeout, HEALTH_CHECK_TIMEOUT);
        config.timeout_secs = 1;
        assert_eq!(SmtpNotifier::new(&config).unwrap().health_timeout, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn silent_relay_health_check_times_out() {
        // Accepts connections but never sends the SMTP greeting.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mut config = config();
        config.smtp_port = listener.local_addr().unwrap().port();
        config.timeout_secs = 30;
        let notifier = SmtpNotifier::new(&config)
            .unwrap()
            .with_health_timeout(Duration::from_millis(200));

        let started = std::time::Instant::now();
        let status = notifier.health_check().await.unwrap();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(matches!(status, HealthStatus::Unhealthy(ref m) if m.contains("did not answer")), "{status:?}");
        drop(listener);
    }

    #[tokio::test]
    async fn unreachable_relay_reports_unhealthy() {
        let notifier = SmtpNotifier::new(&config()).unwrap();
        assert!(matches!(
            notifier.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
