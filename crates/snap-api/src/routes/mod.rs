//! Route definitions
//!
//! API routes mounted under /api/v1; health checks live at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, posts};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(auth_routes()).merge(post_routes())
}

/// Authentication routes
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/verify-email/:token", get(auth::verify_email))
        .route("/auth/forgot-password", post(auth::forgot_password))
        .route("/auth/reset-password/:token", post(auth::reset_password))
}

/// Post and like routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/post", get(posts::list_posts))
        .route("/post/create", post(posts::create_post))
        .route(
            "/post/:id",
            get(posts::get_post)
                .patch(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/post/:id/like",
            post(posts::like_post).delete(posts::unlike_post),
        )
}
