//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub account_tokens: AccountTokenConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub mail: MailConfig,
    pub outbox: OutboxConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
    /// Base URL used in links sent by email and in local blob URLs
    pub public_url: String,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" => Ok(Self::Development),
            other => Err(ConfigError::InvalidValue("APP_ENV", other.to_string())),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// Session (JWT) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,
}

/// Email-confirmation and password-reset token configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccountTokenConfig {
    #[serde(default = "default_account_token_ttl")]
    pub ttl_hours: i64,
}

impl AccountTokenConfig {
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.ttl_hours)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Which blob store adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    S3,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "s3" => Ok(Self::S3),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::InvalidValue("STORAGE_BACKEND", other.to_string())),
        }
    }
}

/// S3-compatible bucket settings
#[derive(Debug, Clone, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    #[serde(default = "default_s3_region")]
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
}

/// File storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: String,
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: u32,
    #[serde(default = "default_presign_ttl")]
    pub presign_ttl_secs: u64,
    pub s3: Option<S3Config>,
}

impl StorageConfig {
    #[must_use]
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb as usize * 1024 * 1024
    }

    #[must_use]
    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }
}

/// Which notifier adapter to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailProvider {
    #[default]
    Log,
    Resend,
}

impl FromStr for MailProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "log" => Ok(Self::Log),
            "resend" => Ok(Self::Resend),
            other => Err(ConfigError::InvalidValue("MAIL_PROVIDER", other.to_string())),
        }
    }
}

/// Outbound email configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    #[serde(default)]
    pub provider: MailProvider,
    #[serde(default = "default_mail_from")]
    pub from: String,
    pub resend_api_key: Option<String>,
    #[serde(default = "default_resend_base_url")]
    pub resend_base_url: String,
}

/// Outbox delivery worker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutboxConfig {
    #[serde(default = "default_outbox_poll_interval")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_outbox_batch_size")]
    pub batch_size: u32,
    #[serde(default = "default_outbox_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_outbox_base_backoff")]
    pub base_backoff_secs: u64,
}

impl Default for OutboxConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_outbox_poll_interval(),
            batch_size: default_outbox_batch_size(),
            max_attempts: default_outbox_max_attempts(),
            base_backoff_secs: default_outbox_base_backoff(),
        }
    }
}

impl OutboxConfig {
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

// Default value functions
fn default_app_name() -> String {
    "snap".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_true() -> bool {
    true
}

fn default_session_ttl() -> i64 {
    86400 // 24 hours
}

fn default_account_token_ttl() -> i64 {
    24
}

fn default_upload_dir() -> String {
    "./uploads".to_string()
}

fn default_max_file_size() -> u32 {
    10
}

fn default_presign_ttl() -> u64 {
    3600
}

fn default_s3_region() -> String {
    "auto".to_string()
}

fn default_mail_from() -> String {
    "no-reply@localhost".to_string()
}

fn default_resend_base_url() -> String {
    "https://api.resend.com".to_string()
}

fn default_outbox_poll_interval() -> u64 {
    2000
}

fn default_outbox_batch_size() -> u32 {
    20
}

fn default_outbox_max_attempts() -> u32 {
    5
}

fn default_outbox_base_backoff() -> u64 {
    30
}

/// Read an optional variable, treating empty values as unset
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

/// Read and parse an optional variable, falling back to `default` when unset or unparsable
fn parsed<T: FromStr>(name: &str, default: fn() -> T) -> T {
    var(name)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or_else(default)
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or an
    /// enumerated value is unknown
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let port: u16 = var("API_PORT")
            .and_then(|s| s.trim().parse().ok())
            .ok_or(ConfigError::MissingVar("API_PORT"))?;

        let backend = var("STORAGE_BACKEND")
            .map(|s| s.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or_default();

        let s3 = match var("S3_BUCKET") {
            Some(bucket) => Some(S3Config {
                bucket,
                region: var("S3_REGION").unwrap_or_else(default_s3_region),
                endpoint: var("S3_ENDPOINT"),
                access_key_id: var("S3_ACCESS_KEY_ID"),
                secret_access_key: var("S3_SECRET_ACCESS_KEY"),
            }),
            None if backend == StorageBackend::S3 => {
                return Err(ConfigError::MissingVar("S3_BUCKET"));
            }
            None => None,
        };

        let provider = var("MAIL_PROVIDER")
            .map(|s| s.parse::<MailProvider>())
            .transpose()?
            .unwrap_or_default();
        let resend_api_key = var("RESEND_API_KEY");
        if provider == MailProvider::Resend && resend_api_key.is_none() {
            return Err(ConfigError::MissingVar("RESEND_API_KEY"));
        }

        Ok(Self {
            app: AppSettings {
                name: var("APP_NAME").unwrap_or_else(default_app_name),
                env: var("APP_ENV")
                    .map(|s| s.parse::<Environment>())
                    .transpose()?
                    .unwrap_or_default(),
                public_url: var("PUBLIC_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| format!("http://localhost:{port}")),
            },
            api: ServerConfig {
                host: var("API_HOST").unwrap_or_else(default_host),
                port,
                request_timeout_secs: parsed("REQUEST_TIMEOUT_SECS", default_request_timeout),
            },
            database: DatabaseConfig {
                url: var("DATABASE_URL").ok_or(ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parsed("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS", default_min_connections),
                run_migrations: parsed("DATABASE_RUN_MIGRATIONS", default_true),
            },
            jwt: JwtConfig {
                secret: var("JWT_SECRET").ok_or(ConfigError::MissingVar("JWT_SECRET"))?,
                session_ttl_secs: parsed("SESSION_TTL_SECS", default_session_ttl),
            },
            account_tokens: AccountTokenConfig {
                ttl_hours: parsed("ACCOUNT_TOKEN_TTL_HOURS", default_account_token_ttl),
            },
            cors: CorsConfig {
                allowed_origins: var("CORS_ALLOWED_ORIGINS")
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            storage: StorageConfig {
                backend,
                upload_dir: var("UPLOAD_DIR").unwrap_or_else(default_upload_dir),
                max_file_size_mb: parsed("MAX_FILE_SIZE_MB", default_max_file_size),
                presign_ttl_secs: parsed("PRESIGN_TTL_SECS", default_presign_ttl),
                s3,
            },
            mail: MailConfig {
                provider,
                from: var("MAIL_FROM").unwrap_or_else(default_mail_from),
                resend_api_key,
                resend_base_url: var("RESEND_BASE_URL")
                    .map(|s| s.trim_end_matches('/').to_string())
                    .unwrap_or_else(default_resend_base_url),
            },
            outbox: OutboxConfig {
                poll_interval_ms: parsed("OUTBOX_POLL_INTERVAL_MS", default_outbox_poll_interval),
                batch_size: parsed("OUTBOX_BATCH_SIZE", default_outbox_batch_size),
                max_attempts: parsed("OUTBOX_MAX_ATTEMPTS", default_outbox_max_attempts),
                base_backoff_secs: parsed("OUTBOX_BASE_BACKOFF_SECS", default_outbox_base_backoff),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
