//! HTTP request handlers
//!
//! Handlers are grouped by resource and delegate to the service layer.

pub mod auth;
pub mod health;
pub mod posts;
