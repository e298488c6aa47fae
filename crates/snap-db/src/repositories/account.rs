//! PostgreSQL implementation of AccountRepository
//!
//! Every method runs in a single transaction; an error from any statement
//! drops the transaction and rolls everything back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{instrument, warn};

use snap_core::{
    AccountRepository, AccountToken, DomainError, OutboxMessage, RepoResult, TokenEffect, User,
    UserId,
};

use crate::models::AccountTokenModel;

use super::error::{map_db_error, map_unique_violation, user_not_found};
use super::outbox::insert_outbox;

/// PostgreSQL implementation of AccountRepository
#[derive(Clone)]
pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    /// Create a new PgAccountRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn insert_token(conn: &mut PgConnection, token: &AccountToken) -> RepoResult<()> {
    sqlx::query(
        r"
        INSERT INTO account_tokens (id, token, user_id, purpose, expires_at, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ",
    )
    .bind(token.id.into_inner())
    .bind(&token.token)
    .bind(token.user_id.into_inner())
    .bind(token.purpose.as_str())
    .bind(token.expires_at)
    .bind(token.active)
    .bind(token.created_at)
    .execute(&mut *conn)
    .await
    .map_err(map_db_error)?;

    Ok(())
}

async fn apply_effect(
    conn: &mut PgConnection,
    user_id: UserId,
    effect: &TokenEffect,
) -> RepoResult<()> {
    let result = match effect {
        TokenEffect::VerifyAccount => {
            sqlx::query(
                r"
                UPDATE users
                SET verified = TRUE, active = TRUE, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(user_id.into_inner())
            .execute(&mut *conn)
            .await
        }
        TokenEffect::SetPassword(hash) => {
            sqlx::query(
                r"
                UPDATE users
                SET password_hash = $2, updated_at = NOW()
                WHERE id = $1
                ",
            )
            .bind(user_id.into_inner())
            .bind(hash)
            .execute(&mut *conn)
            .await
        }
    }
    .map_err(map_db_error)?;

    if result.rows_affected() == 0 {
        return Err(user_not_found(user_id));
    }

    Ok(())
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    #[instrument(skip(self, user, password_hash, token, email), fields(user_id = %user.id))]
    async fn create_account(
        &self,
        user: &User,
        password_hash: &str,
        token: &AccountToken,
        email: &OutboxMessage,
    ) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO users (id, name, email, password_hash, verified, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(user.id.into_inner())
        .bind(&user.name)
        .bind(&user.email)
        .bind(password_hash)
        .bind(user.verified)
        .bind(user.active)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        insert_token(&mut *tx, token).await?;
        insert_outbox(&mut *tx, email).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, token, email), fields(user_id = %token.user_id, purpose = %token.purpose))]
    async fn issue_token(&self, token: &AccountToken, email: &OutboxMessage) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        insert_token(&mut *tx, token).await?;
        insert_outbox(&mut *tx, email).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, token, effect), fields(purpose = %effect.purpose()))]
    async fn consume_token(
        &self,
        token: &str,
        effect: &TokenEffect,
        now: DateTime<Utc>,
    ) -> RepoResult<UserId> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Row lock: a concurrent consumer blocks here and then sees active = FALSE.
        let model = sqlx::query_as::<_, AccountTokenModel>(
            r"
            SELECT id, token, user_id, purpose, expires_at, active, created_at
            FROM account_tokens
            WHERE token = $1
            FOR UPDATE
            ",
        )
        .bind(token)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?
        .ok_or(DomainError::TokenNotFound)?;

        let record = AccountToken::try_from(model)?;
        if let Err(e) = record.check_consumable(effect.purpose(), now) {
            warn!(token_id = %record.id, reason = e.code(), "Account token rejected");
            return Err(e);
        }

        sqlx::query(
            r"
            UPDATE account_tokens SET active = FALSE WHERE id = $1
            ",
        )
        .bind(record.id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        apply_effect(&mut *tx, record.user_id, effect).await?;

        tx.commit().await.map_err(map_db_error)?;
        Ok(record.user_id)
    }
}
