//! Post handlers
//!
//! The public feed plus author-only post management and likes.

use axum::{
    extract::{Path, State},
    Json,
};
use snap_service::{
    FeedPostResponse, FeedService, MessageResponse, PostMutationResponse, PostResponse,
    PostService, UpdatePostRequest,
};

use crate::extractors::{AuthUser, PostForm, PostIdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

const CREATED_MESSAGE: &str = "Post created successfully";
const UPDATED_MESSAGE: &str = "Post updated successfully";
const DELETED_MESSAGE: &str = "Post deleted successfully";
const LIKED_MESSAGE: &str = "Post liked successfully";
const UNLIKED_MESSAGE: &str = "Post unliked successfully";

/// Every post with author and likers, newest first
///
/// GET /post
pub async fn list_posts(State(state): State<AppState>) -> ApiResult<Json<Vec<FeedPostResponse>>> {
    let posts = FeedService::new(state.service_context()).list().await?;
    Ok(Json(posts))
}

/// Create a post from a multipart upload
///
/// POST /post/create
pub async fn create_post(
    State(state): State<AppState>,
    auth: AuthUser,
    PostForm(form): PostForm,
) -> ApiResult<Created<Json<PostMutationResponse>>> {
    let post = PostService::new(state.service_context())
        .create(auth.user_id(), form)
        .await?;

    Ok(Created(Json(PostMutationResponse {
        message: CREATED_MESSAGE.to_string(),
        post: PostResponse::from(post),
    })))
}

/// One post in feed shape
///
/// GET /post/:id
pub async fn get_post(
    State(state): State<AppState>,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<FeedPostResponse>> {
    let post = FeedService::new(state.service_context())
        .get(path.post_id()?)
        .await?;
    Ok(Json(post))
}

/// Replace a post's caption
///
/// PATCH /post/:id
pub async fn update_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
    ValidatedJson(request): ValidatedJson<UpdatePostRequest>,
) -> ApiResult<Json<PostMutationResponse>> {
    let post = PostService::new(state.service_context())
        .update(auth.user_id(), path.post_id()?, request)
        .await?;

    Ok(Json(PostMutationResponse {
        message: UPDATED_MESSAGE.to_string(),
        post: PostResponse::from(post),
    }))
}

/// Delete a post
///
/// DELETE /post/:id
pub async fn delete_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<MessageResponse>> {
    PostService::new(state.service_context())
        .delete(auth.user_id(), path.post_id()?)
        .await?;
    Ok(Json(MessageResponse::new(DELETED_MESSAGE)))
}

/// Like a post
///
/// POST /post/:id/like
pub async fn like_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<MessageResponse>> {
    PostService::new(state.service_context())
        .like(auth.user_id(), path.post_id()?)
        .await?;
    Ok(Json(MessageResponse::new(LIKED_MESSAGE)))
}

/// Remove a like
///
/// DELETE /post/:id/like
pub async fn unlike_post(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(path): Path<PostIdPath>,
) -> ApiResult<Json<MessageResponse>> {
    PostService::new(state.service_context())
        .unlike(auth.user_id(), path.post_id()?)
        .await?;
    Ok(Json(MessageResponse::new(UNLIKED_MESSAGE)))
}
