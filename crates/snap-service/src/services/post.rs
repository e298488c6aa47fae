//! Post service
//!
//! Creating posts with an uploaded image, author-only edits and deletes,
//! and likes.

use snap_core::{
    ensure_owner, is_image_content_type, normalize_caption, object_key, validate_caption,
    Capability, DomainError, Like, Post, PostId, UserId,
};
use tracing::{info, instrument, warn};

use crate::dto::{NewPost, UpdatePostRequest};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Upload the image, then record the post
    ///
    /// Nothing is written if the file is not an image or the upload fails.
    #[instrument(skip(self, input), fields(author_id = %author_id))]
    pub async fn create(&self, author_id: UserId, input: NewPost) -> ServiceResult<Post> {
        let image = input
            .image
            .filter(|image| !image.bytes.is_empty())
            .ok_or(DomainError::MissingImage)?;

        if !is_image_content_type(&image.content_type) {
            warn!(content_type = %image.content_type, "Rejected non-image upload");
            return Err(DomainError::InvalidImageType(image.content_type).into());
        }

        let caption = normalize_caption(input.caption.as_deref())?;

        let key = object_key(image.file_name.as_deref(), &image.content_type);
        let image_ref = self
            .ctx
            .blob_store()
            .put(&key, &image.content_type, image.bytes)
            .await?;

        let post = Post::new(author_id, image_ref, caption);
        self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// Load a post or fail with `PostNotFound`
    async fn load(&self, post_id: PostId) -> ServiceResult<Post> {
        Ok(self
            .ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or(DomainError::PostNotFound(post_id))?)
    }

    /// Replace the caption; author only
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        actor: UserId,
        post_id: PostId,
        request: UpdatePostRequest,
    ) -> ServiceResult<Post> {
        let caption = request.caption.trim();
        validate_caption(caption)?;

        let post = self.load(post_id).await?;
        ensure_owner(actor, &post, Capability::Edit)?;

        let post = self.ctx.post_repo().update_caption(post_id, caption).await?;

        info!(post_id = %post_id, "Post updated");
        Ok(post)
    }

    /// Delete a post with its likes and comments; author only
    #[instrument(skip(self))]
    pub async fn delete(&self, actor: UserId, post_id: PostId) -> ServiceResult<()> {
        let post = self.load(post_id).await?;
        ensure_owner(actor, &post, Capability::Delete)?;

        self.ctx.post_repo().delete(post_id).await?;

        info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    /// Like a post once
    #[instrument(skip(self))]
    pub async fn like(&self, actor: UserId, post_id: PostId) -> ServiceResult<()> {
        self.load(post_id).await?;

        if self.ctx.like_repo().exists(post_id, actor).await? {
            return Err(DomainError::AlreadyLiked.into());
        }

        // A concurrent like loses on the unique constraint with the same error
        self.ctx.like_repo().create(&Like::new(post_id, actor)).await?;

        info!(post_id = %post_id, user_id = %actor, "Post liked");
        Ok(())
    }

    /// Remove the actor's like
    #[instrument(skip(self))]
    pub async fn unlike(&self, actor: UserId, post_id: PostId) -> ServiceResult<()> {
        self.load(post_id).await?;

        if !self.ctx.like_repo().delete(post_id, actor).await? {
            return Err(DomainError::NotLiked.into());
        }

        info!(post_id = %post_id, user_id = %actor, "Post unliked");
        Ok(())
    }
}
