//! Server setup and initialization
//!
//! Provides the application builder, dependency wiring and the server runner.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use snap_common::{AppConfig, AppError, SessionSigner, StorageBackend};
use snap_db::{
    create_pool, run_migrations, PgAccountRepository, PgFeedRepository,
    PgLikeRepository, PgOutboxRepository, PgPool, PgPostRepository, PgUserRepository, PoolConfig,
};
use snap_service::{OutboxWorker, OutboxWorkerConfig, ServiceContext, ServiceSettings};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{info, warn};

use crate::middleware::apply_middleware;
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Multipart framing on top of the file size limit
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let config = state.config();

    let body_limit = config.storage.max_file_size_bytes() + BODY_LIMIT_OVERHEAD;
    let mut router = create_router().layer(DefaultBodyLimit::max(body_limit));

    if config.storage.backend == StorageBackend::Local {
        router = router.nest_service("/uploads", ServeDir::new(&config.storage.upload_dir));
    }

    let router = apply_middleware(
        router.merge(health_routes()),
        &config.cors,
        config.api.request_timeout(),
        config.app.env.is_production(),
    );

    router.with_state(state)
}

/// Connect to the database and apply migrations when enabled
pub async fn connect_database(config: &AppConfig) -> Result<PgPool, AppError> {
    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    if config.database.run_migrations {
        run_migrations(&pool)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
    }

    Ok(pool)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let pool = connect_database(&config).await?;

    let blob_store = snap_blob::from_config(&config.storage, &config.app.public_url).await?;
    info!(backend = ?config.storage.backend, "Blob store ready");

    let notifier = snap_mail::from_config(&config.mail)?;
    info!(provider = ?config.mail.provider, "Mail notifier ready");

    let session_signer = Arc::new(SessionSigner::new(
        &config.jwt.secret,
        config.jwt.session_ttl_secs,
    ));

    let service_context = ServiceContext::builder()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .account_repo(Arc::new(PgAccountRepository::new(pool.clone())))
        .post_repo(Arc::new(PgPostRepository::new(pool.clone())))
        .like_repo(Arc::new(PgLikeRepository::new(pool.clone())))
        .feed_repo(Arc::new(PgFeedRepository::new(pool.clone())))
        .outbox_repo(Arc::new(PgOutboxRepository::new(pool.clone())))
        .blob_store(blob_store)
        .notifier(notifier)
        .session_signer(session_signer)
        .settings(ServiceSettings {
            public_url: config.app.public_url.clone(),
            account_token_ttl: config.account_tokens.ttl(),
        })
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config, pool))
}

/// Serve `app` on `listener` until `shutdown` resolves
pub async fn run_server<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}

/// Run the complete server with configuration
///
/// The outbox worker runs alongside the HTTP server and is stopped once the
/// server has drained.
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {}", e)))?;

    let worker_config = OutboxWorkerConfig::from(&config.outbox);
    let state = create_app_state(config).await?;

    info!("Starting HTTP server on {}", addr);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    serve_with_outbox(listener, state, worker_config, shutdown_signal()).await
}

/// Serve on an already bound listener with the outbox worker running alongside
async fn serve_with_outbox<F>(
    listener: TcpListener,
    state: AppState,
    worker_config: OutboxWorkerConfig,
    shutdown: F,
) -> Result<(), AppError>
where
    F: Future<Output = ()> + Send + 'static,
{
    let worker = Arc::new(OutboxWorker::from_context(
        state.service_context(),
        worker_config,
    ));
    let worker_handle = Arc::clone(&worker).start();

    let served = run_server(listener, create_app(state), shutdown).await;

    worker.stop();
    if let Some(handle) = worker_handle {
        if let Err(e) = handle.await {
            warn!(error = %e, "Outbox worker task ended abnormally");
        }
    }

    info!("Server stopped");
    served
}
