//! Account emails
//!
//! Bodies are plain text. Links point at the public API routes that consume
//! the token, so following a link is enough to complete the flow.

use snap_core::{OutboxMessage, TokenPurpose};

pub const VERIFY_SUBJECT: &str = "Verify your email";
pub const RESET_SUBJECT: &str = "Reset your password";

/// Link that consumes `token` for `purpose`
pub fn account_link(public_url: &str, purpose: TokenPurpose, token: &str) -> String {
    let route = match purpose {
        TokenPurpose::EmailConfirm => "verify-email",
        TokenPurpose::PasswordReset => "reset-password",
    };
    format!(
        "{}/api/v1/auth/{route}/{token}",
        public_url.trim_end_matches('/')
    )
}

/// Queue-ready email carrying a token link
pub fn account_email(
    public_url: &str,
    purpose: TokenPurpose,
    to: &str,
    name: &str,
    token: &str,
) -> OutboxMessage {
    let link = account_link(public_url, purpose, token);
    let (subject, body) = match purpose {
        TokenPurpose::EmailConfirm => (
            VERIFY_SUBJECT,
            format!(
                "Hi {name},\n\n\
                 Thanks for signing up. Confirm your email address by opening this link:\n\n\
                 {link}\n\n\
                 The link expires in 24 hours."
            ),
        ),
        TokenPurpose::PasswordReset => (
            RESET_SUBJECT,
            format!(
                "Hi {name},\n\n\
                 Someone asked to reset the password for this account. To choose a new one, \
                 send your new password to:\n\n\
                 {link}\n\n\
                 If this wasn't you, ignore this email."
            ),
        ),
    };

    OutboxMessage::new(to.to_string(), subject.to_string(), body)
}
