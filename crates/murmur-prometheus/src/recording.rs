// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder (Prometheus, statsd, etc.)
//! can collect these metrics. Without an installed recorder every helper
//! is a no-op.

use metrics::{describe_counter, describe_histogram, Unit};

/// Register all Murmur metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "murmur_feedback_submitted_total",
        "Feedback records accepted and stored"
    );
    describe_counter!(
        "murmur_dispatch_degraded_total",
        "Submissions stored without a queue reference, by reason"
    );
    describe_counter!(
        "murmur_messages_processed_total",
        "Queue messages handled by the consumer, by outcome"
    );
    describe_counter!("murmur_alerts_sent_total", "Admin alerts delivered");
    describe_counter!(
        "murmur_records_missing_total",
        "Queue references whose record was not in the store"
    );
    describe_counter!(
        "murmur_batches_aborted_total",
        "Batches stopped by an infrastructure failure"
    );
    describe_histogram!(
        "murmur_batch_duration_seconds",
        Unit::Seconds,
        "Wall time to process one received batch"
    );
}

/// Record a stored submission.
pub fn record_feedback_submitted() {
    metrics::counter!("murmur_feedback_submitted_total").increment(1);
}

/// Record a submission whose reference could not be dispatched.
pub fn record_dispatch_degraded(reason: &'static str) {
    metrics::counter!("murmur_dispatch_degraded_total", "reason" => reason).increment(1);
}

/// Record the outcome of one queue message.
pub fn record_message_processed(outcome: &'static str) {
    metrics::counter!("murmur_messages_processed_total", "outcome" => outcome).increment(1);
}

/// Record a delivered admin alert.
pub fn record_alert_sent() {
    metrics::counter!("murmur_alerts_sent_total").increment(1);
}

/// Record a reference to a record that does not exist.
pub fn record_missing_record() {
    metrics::counter!("murmur_records_missing_total").increment(1);
}

/// Record a batch aborted before all messages were handled.
pub fn record_batch_aborted() {
    metrics::counter!("murmur_batches_aborted_total").increment(1);
}

/// Record how long a batch took.
pub fn record_batch_duration(seconds: f64) {
    metrics::histogram!("murmur_batch_duration_seconds").record(seconds);
}
