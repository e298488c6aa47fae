//! PostgreSQL implementation of FeedRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use snap_core::{FeedRepository, FeedRow, PostId, RepoResult};

use crate::models::FeedRowModel;

use super::error::map_db_error;

/// Shared SELECT/JOIN clause; one row per (post, like), NULL-padded when a
/// post has no likes
const FEED_SELECT: &str = r"
    SELECT p.id         AS post_id,
           p.image_ref  AS image_ref,
           p.caption    AS caption,
           p.created_at AS created_at,
           a.name       AS author_name,
           l.id         AS like_id,
           l.user_id    AS like_user_id,
           lu.name      AS liker_name
    FROM posts p
    LEFT JOIN users a  ON a.id = p.author_id
    LEFT JOIN likes l  ON l.post_id = p.id
    LEFT JOIN users lu ON lu.id = l.user_id
";

/// PostgreSQL implementation of FeedRepository
#[derive(Clone)]
pub struct PgFeedRepository {
    pool: PgPool,
}

impl PgFeedRepository {
    /// Create a new PgFeedRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FeedRepository for PgFeedRepository {
    #[instrument(skip(self))]
    async fn list_rows(&self) -> RepoResult<Vec<FeedRow>> {
        let sql = format!("{FEED_SELECT} ORDER BY p.created_at DESC, p.id, l.created_at");

        let rows = sqlx::query_as::<_, FeedRowModel>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(FeedRow::from).collect())
    }

    #[instrument(skip(self))]
    async fn rows_for_post(&self, id: PostId) -> RepoResult<Vec<FeedRow>> {
        let sql = format!("{FEED_SELECT} WHERE p.id = $1 ORDER BY l.created_at");

        let rows = sqlx::query_as::<_, FeedRowModel>(&sql)
            .bind(id.into_inner())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(rows.into_iter().map(FeedRow::from).collect())
    }
}
