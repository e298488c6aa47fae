//! # snap-db
//!
//! PostgreSQL implementations of the snap-core repository traits via SQLx.
//!
//! - Connection pool management and runtime migrations
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ```rust,ignore
//! use snap_db::{create_pool, run_migrations, PgUserRepository, PoolConfig};
//!
//! let pool = create_pool(&PoolConfig::new(url)).await?;
//! run_migrations(&pool).await?;
//! let users = PgUserRepository::new(pool.clone());
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, ping, run_migrations, PgPool, PoolConfig, MIGRATOR};
pub use repositories::{
    PgAccountRepository, PgFeedRepository, PgLikeRepository, PgOutboxRepository,
    PgPostRepository, PgUserRepository,
};
