//! Comment entity
//!
//! Stored alongside posts; no operation reads or writes comments yet.

use chrono::{DateTime, Utc};

use crate::value_objects::{CommentId, PostId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub id: CommentId,
    pub post_id: PostId,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: PostId, comment: String) -> Self {
        let now = Utc::now();
        Self {
            id: CommentId::new(),
            post_id,
            comment,
            created_at: now,
            updated_at: now,
        }
    }
}
