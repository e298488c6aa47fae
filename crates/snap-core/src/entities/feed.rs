//! Feed read model
//!
//! The store returns one [`FeedRow`] per (post, like) pair of the outer join
//! post ⋈ author ⋈ like ⋈ liker, with the like columns NULL when a post has no
//! likes. [`fold_feed`] groups those rows back into one [`FeedPost`] per post.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::value_objects::{LikeId, PostId, UserId};

/// One flat row of the feed join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRow {
    pub post_id: PostId,
    pub image_ref: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub like_id: Option<LikeId>,
    pub like_user_id: Option<UserId>,
    pub liker_name: Option<String>,
}

/// A like as shown in the feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedLike {
    pub id: LikeId,
    pub user_id: UserId,
    pub name: Option<String>,
}

/// A post with its author and likers, blob reference still unresolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPost {
    pub id: PostId,
    pub image_ref: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author_name: Option<String>,
    pub likes: Vec<FeedLike>,
}

impl FeedPost {
    fn from_row(row: &FeedRow) -> Self {
        Self {
            id: row.post_id,
            image_ref: row.image_ref.clone(),
            caption: row.caption.clone(),
            created_at: row.created_at,
            author_name: row.author_name.clone(),
            likes: Vec::new(),
        }
    }
}

/// Fold join rows into posts.
///
/// Posts keep the order in which they first appear in `rows`, and likes keep
/// their row order within a post.
pub fn fold_feed<I>(rows: I) -> Vec<FeedPost>
where
    I: IntoIterator<Item = FeedRow>,
{
    let mut posts: Vec<FeedPost> = Vec::new();
    let mut index: HashMap<PostId, usize> = HashMap::new();

    for row in rows {
        let slot = *index.entry(row.post_id).or_insert_with(|| {
            posts.push(FeedPost::from_row(&row));
            posts.len() - 1
        });

        if let (Some(id), Some(user_id)) = (row.like_id, row.like_user_id) {
            posts[slot].likes.push(FeedLike {
                id,
                user_id,
                name: row.liker_name,
            });
        }
    }

    posts
}
