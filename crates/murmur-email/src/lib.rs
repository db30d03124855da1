// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification channels that deliver admin alerts by email.
//!
//! [`SmtpNotifier`] sends through an SMTP relay with lettre.
//! [`LogNotifier`] only writes alerts to the log and is meant for local runs.

pub mod log;
pub mod smtp;

use std::sync::Arc;

use murmur_config::model::{EmailConfig, EmailTransport};
use murmur_core::{MurmurError, NotificationChannel};

pub use log::LogNotifier;
pub use smtp::SmtpNotifier;

/// Build the notification channel selected by `email.transport`.
pub fn build_notifier(config: &EmailConfig) -> Result<Arc<dyn NotificationChannel>, MurmurError> {
    match config.transport {
        EmailTransport::Smtp => Ok(Arc::new(SmtpNotifier::new(config)?)),
        EmailTransport::Log => Ok(Arc::new(LogNotifier::new(&config.source_address))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(transport: EmailTransport) -> EmailConfig {
        EmailConfig {
            transport,
            source_address: "murmur@example.com".into(),
            admin_address: "admin@example.com".into(),
            ..EmailConfig::default()
        }
    }

    #[test]
    fn selects_channel_by_transport() {
        assert_eq!(build_notifier(&config(EmailTransport::Log)).unwrap().name(), "log");
        assert_eq!(build_notifier(&config(EmailTransport::Smtp)).unwrap().name(), "smtp");
    }

    #[test]
    fn smtp_rejects_invalid_source_address() {
        let mut config = config(EmailTransport::Smtp);
        config.source_address = "not an address".into();
        assert!(matches!(build_notifier(&config), Err(MurmurError::Config(_))));
    }
}
