//! Authentication service
//!
//! Handles registration, login, email verification, password reset and
//! resolving a session credential to the live user.

use snap_common::AppError;
use snap_core::{normalize_name, DomainError, TokenEffect, TokenPurpose, User};
use tracing::{debug, error, info, instrument, warn};

use crate::dto::{
    AuthResponse, CurrentUserResponse, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::token::TokenService;

pub const REGISTERED_MESSAGE: &str =
    "User registered successfully. Check your email to verify your account.";
pub const VERIFIED_MESSAGE: &str = "Email verified successfully. You can now log in.";
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent.";
pub const PASSWORD_RESET_MESSAGE: &str = "Password has been reset successfully.";

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Register a new, unverified user and queue the confirmation email
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<MessageResponse> {
        let name = normalize_name(&request.name)?;

        if request.password != request.confirm_password {
            return Err(DomainError::PasswordMismatch.into());
        }

        let email = request.email.trim();

        // Checked again by the unique constraint inside create_account
        if self.ctx.user_repo().find_by_email(email).await?.is_some() {
            return Err(DomainError::EmailAlreadyExists.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password).await?;

        let user = User::new(name, email.to_string());
        let tokens = TokenService::new(self.ctx);
        let token = tokens.mint(user.id, TokenPurpose::EmailConfirm);
        let message = tokens.email_for(&user, &token);

        self.ctx
            .account_repo()
            .create_account(&user, &password_hash, &token, &message)
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(MessageResponse::new(REGISTERED_MESSAGE))
    }

    /// Login with email and password
    ///
    /// Unknown email and wrong password fail identically and take the same time.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        let user = self
            .ctx
            .user_repo()
            .find_by_email(request.email.trim())
            .await?;

        let stored_hash = match &user {
            Some(user) => self.ctx.user_repo().get_password_hash(user.id).await?,
            None => None,
        };

        let matches = self
            .ctx
            .password_service()
            .check(&request.password, stored_hash)
            .await?;

        let user = match user {
            Some(user) if matches => user,
            _ => {
                warn!("Login rejected");
                return Err(AppError::InvalidCredentials.into());
            }
        };

        if !user.can_sign_in() {
            warn!(user_id = %user.id, "Login before verification");
            return Err(DomainError::AccountNotVerified.into());
        }

        let session = self.ctx.session_signer().issue(user.id, &user.name)?;

        info!(user_id = %user.id, "User logged in");
        Ok(AuthResponse {
            access_token: session.token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            user: CurrentUserResponse::from(&user),
        })
    }

    /// Consume an email confirmation token and activate its account
    #[instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> ServiceResult<MessageResponse> {
        let user_id = TokenService::new(self.ctx)
            .consume(token, TokenEffect::VerifyAccount)
            .await?;

        info!(user_id = %user_id, "Email verified");
        Ok(MessageResponse::new(VERIFIED_MESSAGE))
    }

    /// Start a password reset
    ///
    /// The response is the same whether or not the email belongs to an account.
    #[instrument(skip(self, request))]
    pub async fn forgot_password(
        &self,
        request: ForgotPasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        let email = request.email.trim();

        match self.ctx.user_repo().find_by_email(email).await? {
            Some(user) => {
                if let Err(e) = TokenService::new(self.ctx)
                    .issue(&user, TokenPurpose::PasswordReset)
                    .await
                {
                    error!(user_id = %user.id, error = %e, "Failed to issue reset token");
                }
            }
            None => debug!("Password reset requested for unknown email"),
        }

        Ok(MessageResponse::new(FORGOT_PASSWORD_MESSAGE))
    }

    /// Consume a reset token and store the new password
    #[instrument(skip(self, token, request))]
    pub async fn reset_password(
        &self,
        token: &str,
        request: ResetPasswordRequest,
    ) -> ServiceResult<MessageResponse> {
        if request.password != request.confirm_password {
            return Err(DomainError::PasswordMismatch.into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password).await?;
        let user_id = TokenService::new(self.ctx)
            .consume(token, TokenEffect::SetPassword(password_hash))
            .await?;

        info!(user_id = %user_id, "Password reset");
        Ok(MessageResponse::new(PASSWORD_RESET_MESSAGE))
    }

    /// Resolve a session credential to the live user row
    ///
    /// The signature only proves who the credential was issued to; the user is
    /// reloaded so a later deactivation takes effect immediately.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self.ctx.session_signer().verify(token)?;
        let user_id = claims.user_id()?;

        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Session for missing user");
                ServiceError::App(AppError::InvalidToken)
            })?;

        if !user.can_sign_in() {
            warn!(user_id = %user.id, "Session for inactive user");
            return Err(DomainError::AccountNotVerified.into());
        }

        Ok(user)
    }
}
