//! Post entity - an uploaded image with an optional caption

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::policy::Owned;
use crate::value_objects::{PostId, UserId};

/// Minimum caption length, in characters
pub const CAPTION_MIN_CHARS: usize = 2;

/// Maximum caption length, in characters
pub const CAPTION_MAX_CHARS: usize = 2200;

/// Post entity. `image_ref` is a blob-store key, never a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    pub caption: Option<String>,
    pub image_ref: String,
    pub author_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new Post
    pub fn new(author_id: UserId, image_ref: String, caption: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            caption,
            image_ref,
            author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the caption
    pub fn set_caption(&mut self, caption: String) {
        self.caption = Some(caption);
        self.updated_at = Utc::now();
    }
}

impl Owned for Post {
    fn owner_id(&self) -> UserId {
        self.author_id
    }
}

/// Check a caption against the length bounds
pub fn validate_caption(caption: &str) -> Result<(), DomainError> {
    let len = caption.chars().count();
    if len < CAPTION_MIN_CHARS {
        return Err(DomainError::CaptionTooShort {
            min: CAPTION_MIN_CHARS,
        });
    }
    if len > CAPTION_MAX_CHARS {
        return Err(DomainError::CaptionTooLong {
            max: CAPTION_MAX_CHARS,
        });
    }
    Ok(())
}

/// Normalize an optional caption from a create request.
///
/// Blank input means "no caption"; anything else is trimmed and validated.
pub fn normalize_caption(raw: Option<&str>) -> Result<Option<String>, DomainError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(caption) => {
            validate_caption(caption)?;
            Ok(Some(caption.to_string()))
        }
    }
}

/// Whether a declared MIME type is an image
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("image/")
}
