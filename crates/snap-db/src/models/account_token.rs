//! Account token database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for account_tokens table
#[derive(Debug, Clone, FromRow)]
pub struct AccountTokenModel {
    pub id: Uuid,
    pub token: String,
    pub user_id: Uuid,
    pub purpose: String,
    pub expires_at: DateTime<Utc>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}
