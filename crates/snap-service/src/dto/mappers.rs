//! Entity to DTO mappers
//!
//! Implements `From` conversions from domain entities to response DTOs.

use snap_core::{FeedLike, FeedPost, Post, User};

use super::responses::{CurrentUserResponse, FeedLikeResponse, FeedPostResponse, PostResponse};

// ============================================================================
// User Mappers
// ============================================================================

impl From<&User> for CurrentUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

// ============================================================================
// Post Mappers
// ============================================================================

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            caption: post.caption.clone(),
            image: post.image_ref.clone(),
            author_id: post.author_id,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

impl From<Post> for PostResponse {
    fn from(post: Post) -> Self {
        Self::from(&post)
    }
}

// ============================================================================
// Feed Mappers
// ============================================================================

impl From<FeedLike> for FeedLikeResponse {
    fn from(like: FeedLike) -> Self {
        Self {
            id: like.id,
            user_id: like.user_id,
            name: like.name,
        }
    }
}

/// A folded feed post together with its resolved image URL
#[derive(Debug, Clone)]
pub struct ResolvedFeedPost {
    pub post: FeedPost,
    pub image_url: String,
}

impl From<ResolvedFeedPost> for FeedPostResponse {
    fn from(resolved: ResolvedFeedPost) -> Self {
        let ResolvedFeedPost { post, image_url } = resolved;
        Self {
            id: post.id,
            image_url,
            caption: post.caption,
            created_at: post.created_at,
            author: post.author_name,
            likes: post.likes.into_iter().map(FeedLikeResponse::from).collect(),
        }
    }
}
