// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Feedback record persistence.
//!
//! The table name comes from configuration, so it is checked as a plain
//! identifier and quoted before being spliced into SQL.

use std::str::FromStr;

use murmur_core::types::MAX_SCORE;
use murmur_core::{FeedbackId, FeedbackRecord, FeedbackStatus, MurmurError};
use rusqlite::{params, OptionalExtension};
use tracing::warn;

use murmur_config::validation::check_table_name;

use crate::database::{map_tr_err, Database};

/// A feedback table name that is safe to interpolate into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName(String);

impl TableName {
    pub fn new(name: &str) -> Result<Self, MurmurError> {
        check_table_name(name)
            .map_err(|reason| MurmurError::Config(format!("invalid feedback table name: {reason}")))?;
        Ok(Self(name.to_string()))
    }

    fn quoted(&self) -> String {
        format!("\"{}\"", self.0)
    }
}

/// A row as stored, before score and status are checked.
#[derive(Debug)]
struct StoredRow {
    feedback_id: String,
    description: Option<String>,
    score: Option<i64>,
    status: String,
    submitted_at: String,
    submitter_id: Option<String>,
}

impl StoredRow {
    fn into_record(self) -> FeedbackRecord {
        let score = match self.score {
            Some(s) if (0..=i64::from(MAX_SCORE)).contains(&s) => Some(s as u8),
            Some(s) => {
                warn!(feedback_id = %self.feedback_id, score = s, "stored score out of range, treating as absent");
                None
            }
            None => None,
        };
        let status = FeedbackStatus::from_str(&self.status).unwrap_or_else(|_| {
            warn!(feedback_id = %self.feedback_id, status = %self.status, "unknown stored status, reading as PENDING");
            FeedbackStatus::Pending
        });
        FeedbackRecord {
            id: FeedbackId(self.feedback_id),
            description: self.description,
            score,
            status,
            submitted_at: self.submitted_at,
            submitter_id: self.submitter_id,
        }
    }
}

/// Create the feedback table if it does not exist.
pub async fn ensure_table(db: &Database, table: &TableName) -> Result<(), MurmurError> {
    let sql = format!(
        "CREATE TABLE IF NOT EXISTS {} (
            feedback_id TEXT PRIMARY KEY NOT NULL,
            description TEXT,
            score INTEGER,
            status TEXT NOT NULL,
            submitted_at TEXT NOT NULL,
            submitter_id TEXT
        )",
        table.quoted()
    );
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(&sql)?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Insert or fully replace the record with the same id.
pub async fn put(
    db: &Database,
    table: &TableName,
    record: &FeedbackRecord,
) -> Result<(), MurmurError> {
    let sql = format!(
        "INSERT OR REPLACE INTO {} (feedback_id, description, score, status, submitted_at, submitter_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        table.quoted()
    );
    let id = record.id.0.clone();
    let description = record.description.clone();
    let score = record.score.map(i64::from);
    let status = record.status.to_string();
    let submitted_at = record.submitted_at.clone();
    let submitter_id = record.submitter_id.clone();

    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                &sql,
                params![id, description, score, status, submitted_at, submitter_id],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Read a record by id. `Ok(None)` when absent.
pub async fn get(
    db: &Database,
    table: &TableName,
    id: &FeedbackId,
) -> Result<Option<FeedbackRecord>, MurmurError> {
    let sql = format!(
        "SELECT feedback_id, description, score, status, submitted_at, submitter_id
         FROM {} WHERE feedback_id = ?1",
        table.quoted()
    );
    let id = id.0.clone();

    let row = db
        .connection()
        .call(move |conn| -> Result<Option<StoredRow>, rusqlite::Error> {
            conn.query_row(&sql, params![id], |row| {
                Ok(StoredRow {
                    feedback_id: row.get(0)?,
                    description: row.get(1)?,
                    score: row.get(2)?,
                    status: row.get(3)?,
                    submitted_at: row.get(4)?,
                    submitter_id: row.get(5)?,
                })
            })
            .optional()
        })
        .await
        .map_err(map_tr_err)?;

    Ok(row.map(StoredRow::into_record))
}
