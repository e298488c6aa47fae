//! Business logic services
//!
//! This module contains all service layer implementations that handle
//! business logic, validation, and orchestration of domain operations.

pub mod auth;
pub mod context;
pub mod email;
pub mod error;
pub mod feed;
pub mod outbox;
pub mod post;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

// Re-export all services for convenience
pub use auth::AuthService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use error::{ServiceError, ServiceResult};
pub use feed::FeedService;
pub use outbox::{DeliveryReport, OutboxWorker, OutboxWorkerConfig};
pub use post::PostService;
pub use token::TokenService;
