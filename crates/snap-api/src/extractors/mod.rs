//! Axum extractors for request handling
//!
//! Custom extractors for authentication, validation, path ids and
//! multipart post uploads.

mod auth;
mod multipart;
mod path;
mod validated;

pub use auth::AuthUser;
pub use multipart::PostForm;
pub use path::{PostIdPath, TokenPath};
pub use validated::ValidatedJson;
