//! # snap-common
//!
//! Shared utilities including configuration, error handling, session signing,
//! password hashing, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    generate_token_secret, hash_password, verify_password, Claims, PasswordService,
    SessionSigner, SessionToken,
};
pub use config::{
    AccountTokenConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, MailConfig, MailProvider, OutboxConfig, S3Config, ServerConfig,
    StorageBackend, StorageConfig,
};
pub use error::AppError;
pub use telemetry::{try_init_tracing_with_config, TracingConfig, TracingError};
