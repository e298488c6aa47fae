//! Like entity - one user liking one post

use chrono::{DateTime, Utc};

use crate::value_objects::{LikeId, PostId, UserId};

/// Like entity. At most one exists per (post_id, user_id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Like {
    pub id: LikeId,
    pub post_id: PostId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Like {
    /// Create a new Like
    pub fn new(post_id: PostId, user_id: UserId) -> Self {
        Self {
            id: LikeId::new(),
            post_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    /// Check if this like belongs to the given pair
    #[inline]
    pub fn is_for(&self, post_id: PostId, user_id: UserId) -> bool {
        self.post_id == post_id && self.user_id == user_id
    }
}
