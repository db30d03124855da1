// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Admin alert composition.

use murmur_core::{Alert, FeedbackRecord};

pub const ALERT_SUBJECT: &str = "Critical feedback received";

/// Build the plain-text alert for a critical record.
pub fn critical_alert(record: &FeedbackRecord, destination: &str) -> Alert {
    let score = record
        .score
        .map(|s| s.to_string())
        .unwrap_or_default();
    let description = record.description.as_deref().unwrap_or_default();

    let body = format!(
        "Hello Administrator,\n\n\
         New critical feedback has been received and needs your attention.\n\n\
         - Feedback ID: {id}\n\
         - Score: {score}\n\
         - Description: \"{description}\"\n\
         - Submitted at: {submitted_at}\n\n\
         Please review it as soon as possible.\n\n\
         Regards,\nMurmur feedback pipeline",
        id = record.id,
        submitted_at = record.submitted_at,
    );

    Alert {
        destination: destination.to_string(),
        subject: ALERT_SUBJECT.to_string(),
        body,
    }
}
