//! Feed service
//!
//! Folds the post/author/like join into one entry per post and resolves each
//! image key to a short-lived URL.

use futures::future::try_join_all;
use snap_core::{fold_feed, DomainError, FeedPost, FeedRow, PostId};
use tracing::{debug, instrument};

use crate::dto::{FeedPostResponse, ResolvedFeedPost};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Feed service
pub struct FeedService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FeedService<'a> {
    /// Create a new FeedService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Every post, newest first
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<FeedPostResponse>> {
        let rows = self.ctx.feed_repo().list_rows().await?;
        let posts = self.assemble(rows).await?;

        debug!(count = posts.len(), "Feed assembled");
        Ok(posts)
    }

    /// One post
    #[instrument(skip(self))]
    pub async fn get(&self, post_id: PostId) -> ServiceResult<FeedPostResponse> {
        let rows = self.ctx.feed_repo().rows_for_post(post_id).await?;
        self.assemble(rows)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::PostNotFound(post_id).into())
    }

    async fn assemble(&self, rows: Vec<FeedRow>) -> ServiceResult<Vec<FeedPostResponse>> {
        let resolved =
            try_join_all(fold_feed(rows).into_iter().map(|post| self.resolve(post))).await?;
        Ok(resolved.into_iter().map(FeedPostResponse::from).collect())
    }

    async fn resolve(&self, post: FeedPost) -> ServiceResult<ResolvedFeedPost> {
        let image_url = self.ctx.blob_store().presigned_get(&post.image_ref).await?;
        Ok(ResolvedFeedPost { post, image_url })
    }
}
