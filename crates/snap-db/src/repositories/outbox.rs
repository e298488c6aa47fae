//! PostgreSQL implementation of OutboxRepository

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgQueryResult;
use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use snap_core::{DomainError, OutboxId, OutboxMessage, OutboxRepository, OutboxStatus, RepoResult};

use crate::models::OutboxModel;

use super::error::map_db_error;

/// Enqueue a message on an open connection or transaction
pub(crate) async fn insert_outbox(conn: &mut PgConnection, msg: &OutboxMessage) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO email_outbox (id, recipient, subject, body, status, attempts, next_attempt_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ",
    )
    .bind(msg.id.into_inner())
    .bind(&msg.recipient)
    .bind(&msg.subject)
    .bind(&msg.body)
    .bind(msg.status.as_str())
    .bind(msg.attempts)
    .bind(msg.next_attempt_at)
    .bind(msg.created_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

/// PostgreSQL implementation of OutboxRepository
#[derive(Clone)]
pub struct PgOutboxRepository {
    pool: PgPool,
}

impl PgOutboxRepository {
    /// Create a new PgOutboxRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn ensure_updated(result: &PgQueryResult, id: OutboxId) -> RepoResult<()> {
    if result.rows_affected() == 0 {
        return Err(DomainError::DatabaseError(format!(
            "outbox message {id} not found"
        )));
    }
    Ok(())
}

#[async_trait]
impl OutboxRepository for PgOutboxRepository {
    #[instrument(skip(self))]
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        lease: Duration,
    ) -> RepoResult<Vec<OutboxMessage>> {
        let lease = chrono::Duration::from_std(lease)
            .map_err(|e| DomainError::InternalError(format!("invalid lease: {e}")))?;

        let rows = sqlx::query_as::<_, OutboxModel>(
            r"
            UPDATE email_outbox
            SET next_attempt_at = $2
            WHERE id IN (
                SELECT id FROM email_outbox
                WHERE status = $4 AND next_attempt_at <= $1
                ORDER BY next_attempt_at
                LIMIT $3
                FOR UPDATE SKIP LOCKED
            )
            RETURNING id, recipient, subject, body, status, attempts, next_attempt_at,
                      last_error, created_at, sent_at
            ",
        )
        .bind(now)
        .bind(now + lease)
        .bind(i64::from(limit))
        .bind(OutboxStatus::Pending.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(OutboxMessage::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn mark_sent(&self, id: OutboxId, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE email_outbox
            SET status = $2, sent_at = $3, attempts = attempts + 1, last_error = NULL
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(OutboxStatus::Sent.as_str())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        ensure_updated(&result, id)
    }

    #[instrument(skip(self, error))]
    async fn reschedule(
        &self,
        id: OutboxId,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        error: &str,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE email_outbox
            SET attempts = $2, next_attempt_at = $3, last_error = $4
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(attempts)
        .bind(next_attempt_at)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        ensure_updated(&result, id)
    }

    #[instrument(skip(self, error))]
    async fn mark_failed(&self, id: OutboxId, attempts: i32, error: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE email_outbox
            SET status = $2, attempts = $3, last_error = $4
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .bind(OutboxStatus::Failed.as_str())
        .bind(attempts)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        ensure_updated(&result, id)
    }
}
