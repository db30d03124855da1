// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Murmur feedback pipeline.

use std::fmt;

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::MurmurError;

/// Scores at or below this value are critical and trigger an admin alert.
pub const CRITICAL_SCORE_THRESHOLD: u8 = 2;

/// Highest accepted satisfaction score.
pub const MAX_SCORE: u8 = 10;

/// Unique identifier for a feedback record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedbackId(pub String);

impl FeedbackId {
    /// Generate a fresh random identifier (UUID v4).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier assigned to a message by the queue transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier returned by a notification channel for a delivered alert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliveryId(pub String);

impl fmt::Display for DeliveryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle tag of a feedback record.
///
/// Records are created `PENDING`. Later states are written by external
/// tooling and only need to survive a store round trip here.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeedbackStatus {
    #[default]
    Pending,
    InReview,
    Resolved,
}

/// A persisted feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: FeedbackId,
    /// Free text. Always present on submission, may be missing on read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Satisfaction score in `0..=10`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
    pub status: FeedbackStatus,
    /// RFC 3339 timestamp in UTC.
    pub submitted_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<String>,
}

impl FeedbackRecord {
    /// Whether this record must be escalated to the administrator.
    pub fn is_critical(&self) -> bool {
        is_critical_score(self.score)
    }
}

/// A score is critical when present and at or below [`CRITICAL_SCORE_THRESHOLD`].
/// An absent score is never critical.
pub fn is_critical_score(score: Option<u8>) -> bool {
    matches!(score, Some(s) if s <= CRITICAL_SCORE_THRESHOLD)
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Minimal queue payload pointing at a stored record.
///
/// Carries nothing but the id; consumers re-fetch the record from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueReference {
    pub feedback_id: FeedbackId,
}

#[derive(Deserialize)]
struct WireReference {
    #[serde(rename = "feedbackId", default)]
    feedback_id: Option<String>,
}

impl QueueReference {
    pub fn new(feedback_id: FeedbackId) -> Self {
        Self { feedback_id }
    }

    /// Encode as the JSON message body `{"feedbackId": "..."}`.
    pub fn to_body(&self) -> String {
        serde_json::json!({ "feedbackId": self.feedback_id.as_str() }).to_string()
    }

    /// Decode a message body. Fails with [`MurmurError::MalformedMessage`] when
    /// the body is not JSON or `feedbackId` is missing or blank.
    pub fn from_body(body: &str) -> Result<Self, MurmurError> {
        let wire: WireReference = serde_json::from_str(body)
            .map_err(|e| MurmurError::MalformedMessage(format!("unparseable body: {e}")))?;
        match wire.feedback_id {
            Some(id) if !id.trim().is_empty() => Ok(Self::new(FeedbackId(id))),
            _ => Err(MurmurError::MalformedMessage(
                "feedbackId is missing or blank".to_string(),
            )),
        }
    }
}

/// A message delivered by the queue, awaiting acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedMessage {
    pub message_id: MessageId,
    pub body: String,
    /// How many times this message has been delivered, including this one.
    pub receive_count: u32,
}

/// An alert to be delivered by a notification channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub destination: String,
    pub subject: String,
    pub body: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the role an adapter plays in the pipeline.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Store,
    Queue,
    Notification,
    Observability,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(score: Option<u8>) -> FeedbackRecord {
        FeedbackRecord {
            id: FeedbackId("fb-1".into()),
            description: Some("slow checkout".into()),
            score,
            status: FeedbackStatus::Pending,
            submitted_at: "2026-01-01T00:00:00.000Z".into(),
            submitter_id: None,
        }
    }

    #[test]
    fn critical_threshold_is_inclusive() {
        assert!(record(Some(0)).is_critical());
        assert!(record(Some(2)).is_critical());
        assert!(!record(Some(3)).is_critical());
        assert!(!record(Some(10)).is_critical());
    }

    #[test]
    fn absent_score_is_not_critical() {
        assert!(!record(None).is_critical());
    }

    proptest::proptest! {
        #[test]
        fn critical_iff_score_at_or_below_threshold(score in 0u8..=MAX_SCORE) {
            proptest::prop_assert_eq!(is_critical_score(Some(score)), score <= 2);
        }
    }

    #[test]
    fn generated_ids_are_unique_and_non_empty() {
        let a = FeedbackId::generate();
        let b = FeedbackId::generate();
        assert!(!a.as_str().is_empty());
        assert_ne!(a, b);
    }

    #[test]
    fn status_uses_screaming_case() {
        assert_eq!(FeedbackStatus::Pending.to_string(), "PENDING");
        assert_eq!(FeedbackStatus::InReview.to_string(), "IN_REVIEW");
        assert_eq!(
            FeedbackStatus::from_str("RESOLVED").unwrap(),
            FeedbackStatus::Resolved
        );
        let json = serde_json::to_string(&FeedbackStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
    }

    #[test]
    fn record_serializes_camel_case_and_omits_absent_fields() {
        let json = serde_json::to_value(record(None)).unwrap();
        assert_eq!(json["id"], "fb-1");
        assert_eq!(json["submittedAt"], "2026-01-01T00:00:00.000Z");
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("score").is_none());
        assert!(json.get("submitterId").is_none());
    }

    #[test]
    fn now_timestamp_is_rfc3339() {
        let ts = now_timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok(), "{ts}");
        assert!(ts.ends_with('Z'));
    }

    #[test]
    fn reference_body_uses_feedback_id_key() {
        let body = QueueReference::new(FeedbackId("abc".into())).to_body();
        assert_eq!(body, r#"{"feedbackId":"abc"}"#);
        let parsed = QueueReference::from_body(&body).unwrap();
        assert_eq!(parsed.feedback_id.as_str(), "abc");
    }

    #[test]
    fn reference_ignores_extra_fields() {
        let parsed = QueueReference::from_body(r#"{"feedbackId":"x","score":1}"#).unwrap();
        assert_eq!(parsed.feedback_id.as_str(), "x");
    }

    #[test]
    fn malformed_reference_bodies_are_rejected() {
        for body in [
            "",
            "not json",
            "null",
            "[]",
            "{}",
            r#"{"feedbackId":null}"#,
            r#"{"feedbackId":""}"#,
            r#"{"feedbackId":"   "}"#,
            r#"{"feedbackId":42}"#,
        ] {
            let err = QueueReference::from_body(body).unwrap_err();
            assert!(
                matches!(err, MurmurError::MalformedMessage(_)),
                "body {body:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn adapter_type_round_trips_through_strings() {
        for variant in [
            AdapterType::Store,
            AdapterType::Queue,
            AdapterType::Notification,
            AdapterType::Observability,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).unwrap();
            assert_eq!(parsed, variant);
        }
    }
}
