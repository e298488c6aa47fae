//! Service context - dependency container for services
//!
//! Holds the repositories, outbound ports and signing/hashing services that
//! the services need. Everything is injected, so tests can swap any of them.

use std::sync::Arc;

use chrono::Duration;
use snap_common::{PasswordService, SessionSigner};
use snap_core::traits::{
    AccountRepository, BlobStore, FeedRepository, LikeRepository, Notifier, OutboxRepository,
    PostRepository, UserRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Settings the services read at request time
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Base URL embedded in emailed links
    pub public_url: String,
    /// Lifetime of verification and reset tokens
    pub account_token_ttl: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            public_url: "http://localhost:3000".to_string(),
            account_token_ttl: Duration::hours(24),
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    account_repo: Arc<dyn AccountRepository>,
    post_repo: Arc<dyn PostRepository>,
    like_repo: Arc<dyn LikeRepository>,
    feed_repo: Arc<dyn FeedRepository>,
    outbox_repo: Arc<dyn OutboxRepository>,

    // Ports
    blob_store: Arc<dyn BlobStore>,
    notifier: Arc<dyn Notifier>,

    // Services
    session_signer: Arc<SessionSigner>,
    password_service: PasswordService,

    settings: ServiceSettings,
}

impl ServiceContext {
    /// Create a builder
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    pub fn account_repo(&self) -> &dyn AccountRepository {
        self.account_repo.as_ref()
    }

    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    pub fn like_repo(&self) -> &dyn LikeRepository {
        self.like_repo.as_ref()
    }

    pub fn feed_repo(&self) -> &dyn FeedRepository {
        self.feed_repo.as_ref()
    }

    pub fn outbox_repo(&self) -> &dyn OutboxRepository {
        self.outbox_repo.as_ref()
    }

    /// Shared handle to the outbox repository, for the delivery worker
    pub fn outbox_repo_arc(&self) -> Arc<dyn OutboxRepository> {
        Arc::clone(&self.outbox_repo)
    }

    // === Ports ===

    pub fn blob_store(&self) -> &dyn BlobStore {
        self.blob_store.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Shared handle to the notifier, for the delivery worker
    pub fn notifier_arc(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.notifier)
    }

    // === Services ===

    /// Get the session signer
    pub fn session_signer(&self) -> &SessionSigner {
        self.session_signer.as_ref()
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("ports", &"...")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    account_repo: Option<Arc<dyn AccountRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    like_repo: Option<Arc<dyn LikeRepository>>,
    feed_repo: Option<Arc<dyn FeedRepository>>,
    outbox_repo: Option<Arc<dyn OutboxRepository>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    session_signer: Option<Arc<SessionSigner>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn account_repo(mut self, repo: Arc<dyn AccountRepository>) -> Self {
        self.account_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn like_repo(mut self, repo: Arc<dyn LikeRepository>) -> Self {
        self.like_repo = Some(repo);
        self
    }

    pub fn feed_repo(mut self, repo: Arc<dyn FeedRepository>) -> Self {
        self.feed_repo = Some(repo);
        self
    }

    pub fn outbox_repo(mut self, repo: Arc<dyn OutboxRepository>) -> Self {
        self.outbox_repo = Some(repo);
        self
    }

    pub fn blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn session_signer(mut self, signer: Arc<SessionSigner>) -> Self {
        self.session_signer = Some(signer);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            user_repo: required(self.user_repo, "user_repo")?,
            account_repo: required(self.account_repo, "account_repo")?,
            post_repo: required(self.post_repo, "post_repo")?,
            like_repo: required(self.like_repo, "like_repo")?,
            feed_repo: required(self.feed_repo, "feed_repo")?,
            outbox_repo: required(self.outbox_repo, "outbox_repo")?,
            blob_store: required(self.blob_store, "blob_store")?,
            notifier: required(self.notifier, "notifier")?,
            session_signer: required(self.session_signer, "session_signer")?,
            password_service: PasswordService::new(),
            settings: self.settings,
        })
    }
}
