//! Account token service
//!
//! Mints single-use verification and reset tokens and consumes them. Issuing a
//! token never invalidates earlier ones for the same user and purpose.

use chrono::Utc;
use snap_common::generate_token_secret;
use snap_core::{AccountToken, OutboxMessage, TokenEffect, TokenPurpose, User, UserId};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::email::account_email;
use super::error::ServiceResult;

/// Token issuer/validator
pub struct TokenService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TokenService<'a> {
    /// Create a new TokenService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Build a fresh active token; nothing is stored
    pub fn mint(&self, user_id: UserId, purpose: TokenPurpose) -> AccountToken {
        AccountToken::new(
            user_id,
            generate_token_secret(),
            purpose,
            self.ctx.settings().account_token_ttl,
        )
    }

    /// The email that delivers `token` to `user`
    pub fn email_for(&self, user: &User, token: &AccountToken) -> OutboxMessage {
        account_email(
            &self.ctx.settings().public_url,
            token.purpose,
            &user.email,
            &user.name,
            &token.token,
        )
    }

    /// Store a new token for an existing user and queue its email
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn issue(&self, user: &User, purpose: TokenPurpose) -> ServiceResult<String> {
        let token = self.mint(user.id, purpose);
        let email = self.email_for(user, &token);

        self.ctx.account_repo().issue_token(&token, &email).await?;

        info!(%purpose, "Account token issued");
        Ok(token.token)
    }

    /// Consume `token` and apply `effect` to its owner
    #[instrument(skip(self, token, effect), fields(purpose = %effect.purpose()))]
    pub async fn consume(&self, token: &str, effect: TokenEffect) -> ServiceResult<UserId> {
        let user_id = self
            .ctx
            .account_repo()
            .consume_token(token, &effect, Utc::now())
            .await
            .inspect_err(|e| warn!(error = %e, "Token rejected"))?;

        info!(user_id = %user_id, "Account token consumed");
        Ok(user_id)
    }
}
