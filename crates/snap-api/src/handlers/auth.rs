//! Authentication handlers
//!
//! Endpoints for registration, login, email verification and password resets.

use axum::{
    extract::{Path, State},
    Json,
};
use snap_service::{
    AuthResponse, AuthService, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest,
};

use crate::extractors::{TokenPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Register a new user
///
/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> ApiResult<Created<Json<MessageResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.register(request).await?;
    Ok(Created(Json(response)))
}

/// Login with email and password
///
/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.login(request).await?;
    Ok(Json(response))
}

/// Confirm an email address
///
/// GET /auth/verify-email/:token
pub async fn verify_email(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.verify_email(&path.token).await?;
    Ok(Json(response))
}

/// Request a password reset link
///
/// POST /auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.forgot_password(request).await?;
    Ok(Json(response))
}

/// Set a new password with a reset token
///
/// POST /auth/reset-password/:token
pub async fn reset_password(
    State(state): State<AppState>,
    Path(path): Path<TokenPath>,
    ValidatedJson(request): ValidatedJson<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let service = AuthService::new(state.service_context());
    let response = service.reset_password(&path.token, request).await?;
    Ok(Json(response))
}
