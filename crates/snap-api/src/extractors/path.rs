//! Path parameter extractors

use serde::Deserialize;
use snap_core::PostId;

use crate::response::ApiError;

/// Path parameters with a post id
#[derive(Debug, Deserialize)]
pub struct PostIdPath {
    pub id: String,
}

impl PostIdPath {
    /// Parse the id as a PostId
    pub fn post_id(&self) -> Result<PostId, ApiError> {
        PostId::parse(&self.id).map_err(|_| ApiError::invalid_path("Invalid post id format"))
    }
}

/// Path parameters carrying an account token
#[derive(Debug, Deserialize)]
pub struct TokenPath {
    pub token: String,
}
