//! Test fixtures and data generators
//!
//! Provides reusable request bodies and response shapes for integration tests.

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

pub const TEST_PASSWORD: &str = "secret123";

/// Unique suffix so repeated runs against one database never collide
pub fn unique_suffix() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Registration request
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterRequest {
    pub fn unique() -> Self {
        let suffix = unique_suffix();
        Self {
            name: format!("Tester {}", &suffix[..8]),
            email: format!("test-{suffix}@example.com"),
            password: TEST_PASSWORD.to_string(),
            confirm_password: TEST_PASSWORD.to_string(),
        }
    }
}

/// Login request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn from_register(reg: &RegisterRequest) -> Self {
        Self {
            email: reg.email.clone(),
            password: reg.password.clone(),
        }
    }
}

/// Body of forgot-password requests
#[derive(Debug, Serialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// Body of reset-password requests
#[derive(Debug, Serialize)]
pub struct ResetPasswordRequest {
    pub password: String,
    pub confirm_password: String,
}

impl ResetPasswordRequest {
    pub fn matching(password: &str) -> Self {
        Self {
            password: password.to_string(),
            confirm_password: password.to_string(),
        }
    }
}

/// Body of caption updates
#[derive(Debug, Serialize)]
pub struct UpdatePostRequest {
    pub caption: String,
}

/// `{ "message": ... }` responses
#[derive(Debug, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Successful login
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Signed-in user
#[derive(Debug, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A post as returned by create and update
#[derive(Debug, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub caption: Option<String>,
    pub image: String,
    pub author_id: String,
}

/// Create and update responses
#[derive(Debug, Deserialize)]
pub struct PostMutationResponse {
    pub message: String,
    pub post: PostResponse,
}

/// A liker in a feed entry
#[derive(Debug, Deserialize)]
pub struct FeedLikeResponse {
    pub id: String,
    pub user_id: String,
    pub name: Option<String>,
}

/// A feed entry
#[derive(Debug, Deserialize)]
pub struct FeedPostResponse {
    pub id: String,
    pub image_url: String,
    pub caption: Option<String>,
    pub author: Option<String>,
    pub likes: Vec<FeedLikeResponse>,
}

/// Error envelope
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

/// Multipart form with a tiny PNG and an optional caption
pub fn image_form(caption: Option<&str>) -> Form {
    file_form("photo.png", "image/png", caption)
}

/// Multipart form with an arbitrary file part
pub fn file_form(file_name: &str, content_type: &str, caption: Option<&str>) -> Form {
    let part = Part::bytes(b"\x89PNG\r\n\x1a\nfake".to_vec())
        .file_name(file_name.to_string())
        .mime_str(content_type)
        .unwrap_or_else(|_| Part::bytes(Vec::new()));

    let form = Form::new().part("image", part);
    match caption {
        Some(caption) => form.text("caption", caption.to_string()),
        None => form,
    }
}
