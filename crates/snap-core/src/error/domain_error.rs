//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::policy::Capability;
use crate::value_objects::{PostId, UserId};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Post not found")]
    PostNotFound(PostId),

    #[error("Token not found")]
    TokenNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Only image files are allowed")]
    InvalidImageType(String),

    #[error("No files were uploaded")]
    MissingImage,

    #[error("Name must be at least {min} characters long")]
    NameTooShort { min: usize },

    #[error("Caption must be at least {min} characters long")]
    CaptionTooShort { min: usize },

    #[error("Caption must be at most {max} characters long")]
    CaptionTooLong { max: usize },

    #[error("Passwords do not match")]
    PasswordMismatch,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Account is not verified")]
    AccountNotVerified,

    #[error("Only the author can {0} this post")]
    NotOwner(Capability),

    // =========================================================================
    // Token Errors
    // =========================================================================
    #[error("Token has expired")]
    TokenExpired,

    #[error("Token is invalid or has already been used")]
    TokenInvalid,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already exists")]
    EmailAlreadyExists,

    #[error("Post already liked")]
    AlreadyLiked,

    #[error("Post not liked")]
    NotLiked,

    // =========================================================================
    // Upstream Errors (blob store, notifier)
    // =========================================================================
    #[error("Blob store error: {0}")]
    BlobStoreError(String),

    #[error("Notifier error: {0}")]
    NotifierError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::TokenNotFound => "UNKNOWN_TOKEN",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidImageType(_) => "INVALID_IMAGE_TYPE",
            Self::MissingImage => "MISSING_IMAGE",
            Self::NameTooShort { .. } => "NAME_TOO_SHORT",
            Self::CaptionTooShort { .. } => "CAPTION_TOO_SHORT",
            Self::CaptionTooLong { .. } => "CAPTION_TOO_LONG",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",

            // Authorization
            Self::AccountNotVerified => "ACCOUNT_NOT_VERIFIED",
            Self::NotOwner(_) => "NOT_POST_AUTHOR",

            // Token
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::TokenInvalid => "TOKEN_INVALID",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::AlreadyLiked => "POST_ALREADY_LIKED",
            Self::NotLiked => "POST_NOT_LIKED",

            // Upstream
            Self::BlobStoreError(_) => "BLOB_STORE_ERROR",
            Self::NotifierError(_) => "NOTIFIER_ERROR",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Input field the error refers to, for field-keyed error details
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::NameTooShort { .. } => Some("name"),
            Self::EmailAlreadyExists => Some("email"),
            Self::PasswordMismatch => Some("confirm_password"),
            Self::CaptionTooShort { .. } | Self::CaptionTooLong { .. } => Some("caption"),
            Self::InvalidImageType(_) | Self::MissingImage => Some("image"),
            _ => None,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::PostNotFound(_) | Self::TokenNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidImageType(_)
                | Self::MissingImage
                | Self::NameTooShort { .. }
                | Self::CaptionTooShort { .. }
                | Self::CaptionTooLong { .. }
                | Self::PasswordMismatch
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccountNotVerified | Self::NotOwner(_))
    }

    /// Check if an account token was rejected as expired or unusable
    pub fn is_token_rejection(&self) -> bool {
        matches!(self, Self::TokenExpired | Self::TokenInvalid)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists | Self::AlreadyLiked | Self::NotLiked
        )
    }

    /// Check if an external collaborator failed
    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::BlobStoreError(_) | Self::NotifierError(_))
    }
}
