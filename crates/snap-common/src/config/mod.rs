//! Configuration structs

mod app_config;

pub use app_config::{
    AccountTokenConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig,
    Environment, JwtConfig, MailConfig, MailProvider, OutboxConfig, S3Config, ServerConfig,
    StorageBackend, StorageConfig,
};
