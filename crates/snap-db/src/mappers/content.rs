//! Post, like, comment and feed row mappers

use snap_core::{Comment, CommentId, FeedRow, Like, LikeId, Post, PostId, UserId};

use crate::models::{CommentModel, FeedRowModel, LikeModel, PostModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::from(model.id),
            caption: model.caption,
            image_ref: model.image_ref,
            author_id: UserId::from(model.author_id),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<LikeModel> for Like {
    fn from(model: LikeModel) -> Self {
        Like {
            id: LikeId::from(model.id),
            post_id: PostId::from(model.post_id),
            user_id: UserId::from(model.user_id),
            created_at: model.created_at,
        }
    }
}

impl From<CommentModel> for Comment {
    fn from(model: CommentModel) -> Self {
        Comment {
            id: CommentId::from(model.id),
            post_id: PostId::from(model.post_id),
            comment: model.comment,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<FeedRowModel> for FeedRow {
    fn from(model: FeedRowModel) -> Self {
        FeedRow {
            post_id: PostId::from(model.post_id),
            image_ref: model.image_ref,
            caption: model.caption,
            created_at: model.created_at,
            author_name: model.author_name,
            like_id: model.like_id.map(LikeId::from),
            like_user_id: model.like_user_id.map(UserId::from),
            liker_name: model.liker_name,
        }
    }
}
