//! Feed join row

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One row of posts ⋈ users ⋈ likes ⋈ users; like columns are NULL for a
/// post nobody has liked
#[derive(Debug, Clone, FromRow)]
pub struct FeedRowModel {
    pub post_id: Uuid,
    pub image_ref: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub like_id: Option<Uuid>,
    pub like_user_id: Option<Uuid>,
    pub liker_name: Option<String>,
}
