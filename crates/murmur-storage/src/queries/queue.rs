// SPDX-FileCopyrightText: 2026 Murmur Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue operations with visibility timeouts and dead-lettering.
//!
//! A received message is hidden until `visible_at`. If it is not acked
//! before then it becomes visible again. A message that has already been
//! delivered `max_receives` times is moved to `dead` instead of being
//! delivered again.

use std::time::Duration;

use murmur_core::{MessageId, MurmurError, ReceivedMessage};
use rusqlite::params;

use crate::database::{map_tr_err, now_millis, Database};

/// Outcome of a receive: the claimed messages and how many were dead-lettered.
#[derive(Debug, Default)]
pub struct Claimed {
    pub messages: Vec<ReceivedMessage>,
    pub dead_lettered: usize,
}

/// Append a message to the named queue. Returns its row id.
pub async fn enqueue(db: &Database, queue_name: &str, body: &str) -> Result<i64, MurmurError> {
    let queue_name = queue_name.to_string();
    let body = body.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.execute(
                "INSERT INTO queue_messages (queue_name, body, visible_at) VALUES (?1, ?2, ?3)",
                params![queue_name, body, now_millis()],
            )?;
            Ok(conn.last_insert_rowid())
        })
        .await
        .map_err(map_tr_err)
}

/// Claim up to `max` visible messages, oldest first, hiding them for `visibility`.
pub async fn claim(
    db: &Database,
    queue_name: &str,
    max: usize,
    visibility: Duration,
    max_receives: u32,
) -> Result<Claimed, MurmurError> {
    if max == 0 {
        return Ok(Claimed::default());
    }
    let queue_name = queue_name.to_string();
    let limit = i64::try_from(max).unwrap_or(i64::MAX);
    let visibility_ms = i64::try_from(visibility.as_millis()).unwrap_or(i64::MAX);

    db.connection()
        .call(move |conn| -> Result<Claimed, rusqlite::Error> {
            let now = now_millis();
            let tx = conn.transaction()?;

            let dead_lettered = tx.execute(
                "UPDATE queue_messages
                 SET status = 'dead', updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE queue_name = ?1 AND status = 'pending'
                   AND visible_at <= ?2 AND receive_count >= ?3",
                params![queue_name, now, max_receives],
            )?;

            let rows: Vec<(i64, String, u32)> = {
                let mut stmt = tx.prepare(
                    "SELECT id, body, receive_count FROM queue_messages
                     WHERE queue_name = ?1 AND status = 'pending' AND visible_at <= ?2
                     ORDER BY id ASC
                     LIMIT ?3",
                )?;
                stmt.query_map(params![queue_name, now, limit], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                })?
                .collect::<Result<_, _>>()?
            };

            let hidden_until = now.saturating_add(visibility_ms);
            let mut messages = Vec::with_capacity(rows.len());
            for (id, body, receive_count) in rows {
                tx.execute(
                    "UPDATE queue_messages
                     SET receive_count = receive_count + 1, visible_at = ?2,
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                     WHERE id = ?1",
                    params![id, hidden_until],
                )?;
                messages.push(ReceivedMessage {
                    message_id: MessageId(id.to_string()),
                    body,
                    receive_count: receive_count + 1,
                });
            }

            tx.commit()?;
            Ok(Claimed {
                messages,
                dead_lettered,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Delete an acknowledged message. Returns `false` if it was already gone.
pub async fn delete(db: &Database, queue_name: &str, id: i64) -> Result<bool, MurmurError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let n = conn.execute(
                "DELETE FROM queue_messages WHERE id = ?1 AND queue_name = ?2",
                params![id, queue_name],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Messages moved to the dead-letter state, oldest first.
pub async fn dead_letters(
    db: &Database,
    queue_name: &str,
) -> Result<Vec<ReceivedMessage>, MurmurError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| -> Result<Vec<ReceivedMessage>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, body, receive_count FROM queue_messages
                 WHERE queue_name = ?1 AND status = 'dead'
                 ORDER BY id ASC",
            )?;
            let rows = stmt
                .query_map(params![queue_name], |row| {
                    Ok(ReceivedMessage {
                        message_id: MessageId(row.get::<_, i64>(0)?.to_string()),
                        body: row.get(1)?,
                        receive_count: row.get(2)?,
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)
}

/// Number of pending (not dead) messages, visible or not.
pub async fn pending_count(db: &Database, queue_name: &str) -> Result<u64, MurmurError> {
    let queue_name = queue_name.to_string();
    db.connection()
        .call(move |conn| -> Result<i64, rusqlite::Error> {
            conn.query_row(
                "SELECT COUNT(*) FROM queue_messages WHERE queue_name = ?1 AND status = 'pending'",
                params![queue_name],
                |row| row.get(0),
            )
        })
        .await
        .map(|n| u64::try_from(n).unwrap_or(0))
        .map_err(map_tr_err)
}
