// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Murmur feedback pipeline.

use thiserror::Error;

/// The primary error type used across all Murmur adapter traits and services.
#[derive(Debug, Error)]
pub enum MurmurError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (connection failure, query failure, closed handle).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Queue transport errors (enqueue, receive or acknowledge failed).
    #[error("queue error: {message}")]
    Queue {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Notification delivery failed at the transport level.
    #[error("notification error: {message}")]
    Notification {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A notification address could not be parsed.
    #[error("invalid address `{address}`: {reason}")]
    InvalidAddress { address: String, reason: String },

    /// A queue message body that can never be processed.
    #[error("malformed message: {0}")]
    MalformedMessage(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MurmurError {
    /// Returns `true` for failures talking to a dependency (store, queue,
    /// notification transport), which may succeed when retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            MurmurError::Storage { .. } | MurmurError::Queue { .. } | MurmurError::Notification { .. }
        )
    }

    /// Shorthand for a storage error from a plain message.
    pub fn storage(message: impl Into<String>) -> Self {
        let message: String = message.into();
        MurmurError::Storage {
            source: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infrastructure_faults_are_transient() {
        assert!(MurmurError::storage("down").is_transient());
        assert!(MurmurError::Queue {
            message: "unreachable".into(),
            source: None,
        }
        .is_transient());
        assert!(MurmurError::Notification {
            message: "smtp 421".into(),
            source: None,
        }
        .is_transient());
    }

    #[test]
    fn data_level_conditions_are_not_transient() {
        assert!(!MurmurError::MalformedMessage("not json".into()).is_transient());
        assert!(!MurmurError::InvalidAddress {
            address: "nope".into(),
            reason: "missing domain".into(),
        }
        .is_transient());
        assert!(!MurmurError::Config("bad".into()).is_transient());
    }

    #[test]
    fn storage_error_displays_source() {
        let err = MurmurError::storage("database is locked");
        assert_eq!(err.to_string(), "storage error: database is locked");
    }
}
