//! Multipart post upload extractor
//!
//! Reads an `image` file part and an optional `caption` text part.
//! Unknown parts are skipped.

use axum::{
    async_trait,
    extract::{multipart::MultipartError, FromRequest, Multipart, Request},
    http::StatusCode,
};
use snap_service::{NewPost, UploadedImage};

use crate::response::ApiError;

const IMAGE_FIELD: &str = "image";
const CAPTION_FIELD: &str = "caption";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Parsed post creation form
#[derive(Debug)]
pub struct PostForm(pub NewPost);

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::invalid_body(e.body_text())
    }
}

#[async_trait]
impl<S> FromRequest<S> for PostForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        let mut form = NewPost::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().map(str::to_string);
            match name.as_deref() {
                Some(IMAGE_FIELD) => {
                    let file_name = field.file_name().map(str::to_string);
                    let content_type = field
                        .content_type()
                        .unwrap_or(FALLBACK_CONTENT_TYPE)
                        .to_string();
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
                Some(CAPTION_FIELD) => {
                    form.caption = Some(field.text().await.map_err(multipart_error)?);
                }
                _ => {}
            }
        }

        Ok(PostForm(form))
    }
}
