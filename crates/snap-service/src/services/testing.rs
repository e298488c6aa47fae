//! In-memory fakes for service tests

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use snap_common::{hash_password, SessionSigner};
use snap_core::{
    AccountRepository, AccountToken, BlobStore, DomainError, FeedRepository, FeedRow, Like,
    LikeRepository, Notifier, OutboxId, OutboxMessage, OutboxRepository, OutboxStatus,
    PortResult, Post, PostId, PostRepository, RepoResult, TokenEffect, User, UserId,
    UserRepository,
};

use super::context::{ServiceContext, ServiceSettings};

pub const TEST_SECRET: &str = "test-secret-key-for-service-tests";
pub const TEST_PUBLIC_URL: &str = "http://snap.test";

#[derive(Default)]
struct State {
    users: HashMap<UserId, (User, String)>,
    tokens: HashMap<String, AccountToken>,
    posts: HashMap<PostId, Post>,
    likes: Vec<Like>,
    outbox: Vec<OutboxMessage>,
}

/// Every repository over one mutex, so each call is atomic
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    /// Fail this many outbox status updates before succeeding again
    pub outbox_update_failures: AtomicU32,
}

impl InMemoryStore {
    pub fn insert_user(&self, user: User, password_hash: String) {
        self.state.lock().users.insert(user.id, (user, password_hash));
    }

    pub fn insert_token(&self, token: AccountToken) {
        self.state.lock().tokens.insert(token.token.clone(), token);
    }

    pub fn insert_post(&self, post: Post) {
        self.state.lock().posts.insert(post.id, post);
    }

    pub fn user(&self, id: UserId) -> Option<User> {
        self.state.lock().users.get(&id).map(|(u, _)| u.clone())
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        self.state
            .lock()
            .users
            .values()
            .find(|(u, _)| u.email == email)
            .map(|(u, _)| u.clone())
    }

    pub fn password_hash(&self, id: UserId) -> Option<String> {
        self.state.lock().users.get(&id).map(|(_, h)| h.clone())
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().users.len()
    }

    pub fn post_count(&self) -> usize {
        self.state.lock().posts.len()
    }

    pub fn like_count(&self, post_id: PostId) -> usize {
        self.state
            .lock()
            .likes
            .iter()
            .filter(|l| l.post_id == post_id)
            .count()
    }

    pub fn outbox(&self) -> Vec<OutboxMessage> {
        self.state.lock().outbox.clone()
    }

    pub fn outbox_for(&self, recipient: &str) -> Vec<OutboxMessage> {
        self.state
            .lock()
            .outbox
            .iter()
            .filter(|m| m.recipient == recipient)
            .cloned()
            .collect()
    }

    /// Token embedded in the newest email to `recipient`
    pub fn latest_token_for(&self, recipient: &str) -> Option<String> {
        let messages = self.outbox_for(recipient);
        let body = &messages.last()?.body;
        body.lines()
            .find(|line| line.contains("/api/v1/auth/"))
            .and_then(|line| line.trim().rsplit('/').next())
            .map(str::to_string)
    }

    pub fn make_due(&self, id: OutboxId) {
        if let Some(msg) = self.state.lock().outbox.iter_mut().find(|m| m.id == id) {
            msg.next_attempt_at = Utc::now() - chrono::Duration::seconds(1);
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.user(id))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        Ok(self.user_by_email(email))
    }

    async fn get_password_hash(&self, id: UserId) -> RepoResult<Option<String>> {
        Ok(self.password_hash(id))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn create_account(
        &self,
        user: &User,
        password_hash: &str,
        token: &AccountToken,
        email: &OutboxMessage,
    ) -> RepoResult<()> {
        let mut state = self.state.lock();
        if state.users.values().any(|(u, _)| u.email == user.email) {
            return Err(DomainError::EmailAlreadyExists);
        }
        state
            .users
            .insert(user.id, (user.clone(), password_hash.to_string()));
        state.tokens.insert(token.token.clone(), token.clone());
        state.outbox.push(email.clone());
        Ok(())
    }

    async fn issue_token(&self, token: &AccountToken, email: &OutboxMessage) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.users.contains_key(&token.user_id) {
            return Err(DomainError::UserNotFound(token.user_id));
        }
        state.tokens.insert(token.token.clone(), token.clone());
        state.outbox.push(email.clone());
        Ok(())
    }

    async fn consume_token(
        &self,
        token: &str,
        effect: &TokenEffect,
        now: DateTime<Utc>,
    ) -> RepoResult<UserId> {
        let mut state = self.state.lock();
        let stored = state.tokens.get(token).ok_or(DomainError::TokenNotFound)?;
        stored.check_consumable(effect.purpose(), now)?;
        let user_id = stored.user_id;

        let (user, hash) = state
            .users
            .get_mut(&user_id)
            .ok_or(DomainError::UserNotFound(user_id))?;
        match effect {
            TokenEffect::VerifyAccount => user.mark_verified(),
            TokenEffect::SetPassword(new_hash) => hash.clone_from(new_hash),
        }

        if let Some(stored) = state.tokens.get_mut(token) {
            stored.active = false;
        }
        Ok(user_id)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find_by_id(&self, id: PostId) -> RepoResult<Option<Post>> {
        Ok(self.state.lock().posts.get(&id).cloned())
    }

    async fn create(&self, post: &Post) -> RepoResult<()> {
        self.insert_post(post.clone());
        Ok(())
    }

    async fn update_caption(&self, id: PostId, caption: &str) -> RepoResult<Post> {
        let mut state = self.state.lock();
        let post = state
            .posts
            .get_mut(&id)
            .ok_or(DomainError::PostNotFound(id))?;
        post.set_caption(caption.to_string());
        Ok(post.clone())
    }

    async fn delete(&self, id: PostId) -> RepoResult<()> {
        let mut state = self.state.lock();
        state
            .posts
            .remove(&id)
            .ok_or(DomainError::PostNotFound(id))?;
        state.likes.retain(|l| l.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl LikeRepository for InMemoryStore {
    async fn exists(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool> {
        Ok(self
            .state
            .lock()
            .likes
            .iter()
            .any(|l| l.is_for(post_id, user_id)))
    }

    async fn create(&self, like: &Like) -> RepoResult<()> {
        let mut state = self.state.lock();
        if !state.posts.contains_key(&like.post_id) {
            return Err(DomainError::PostNotFound(like.post_id));
        }
        if state.likes.iter().any(|l| l.is_for(like.post_id, like.user_id)) {
            return Err(DomainError::AlreadyLiked);
        }
        state.likes.push(like.clone());
        Ok(())
    }

    async fn delete(&self, post_id: PostId, user_id: UserId) -> RepoResult<bool> {
        let mut state = self.state.lock();
        let before = state.likes.len();
        state.likes.retain(|l| !l.is_for(post_id, user_id));
        Ok(state.likes.len() != before)
    }
}

impl InMemoryStore {
    fn rows(&self, only: Option<PostId>) -> Vec<FeedRow> {
        let state = self.state.lock();
        let name_of = |id: UserId| state.users.get(&id).map(|(u, _)| u.name.clone());

        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|p| only.map_or(true, |id| p.id == id))
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let mut rows = Vec::new();
        for post in posts {
            let base = FeedRow {
                post_id: post.id,
                image_ref: post.image_ref.clone(),
                caption: post.caption.clone(),
                created_at: post.created_at,
                author_name: name_of(post.author_id),
                like_id: None,
                like_user_id: None,
                liker_name: None,
            };
            let likes: Vec<&Like> = state.likes.iter().filter(|l| l.post_id == post.id).collect();
            if likes.is_empty() {
                rows.push(base);
                continue;
            }
            for like in likes {
                rows.push(FeedRow {
                    like_id: Some(like.id),
                    like_user_id: Some(like.user_id),
                    liker_name: name_of(like.user_id),
                    ..base.clone()
                });
            }
        }
        rows
    }
}

#[async_trait]
impl FeedRepository for InMemoryStore {
    async fn list_rows(&self) -> RepoResult<Vec<FeedRow>> {
        Ok(self.rows(None))
    }

    async fn rows_for_post(&self, id: PostId) -> RepoResult<Vec<FeedRow>> {
        Ok(self.rows(Some(id)))
    }
}

#[async_trait]
impl OutboxRepository for InMemoryStore {
    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: u32,
        lease: Duration,
    ) -> RepoResult<Vec<OutboxMessage>> {
        let lease = chrono::Duration::from_std(lease)
            .map_err(|e| DomainError::InternalError(e.to_string()))?;
        let mut state = self.state.lock();
        let mut due: Vec<&mut OutboxMessage> = state
            .outbox
            .iter_mut()
            .filter(|m| m.status == OutboxStatus::Pending && m.next_attempt_at <= now)
            .collect();
        due.sort_by_key(|m| m.next_attempt_at);

        Ok(due
            .into_iter()
            .take(limit as usize)
            .map(|m| {
                m.next_attempt_at = now + lease;
                m.clone()
            })
            .collect())
    }

    async fn mark_sent(&self, id: OutboxId, at: DateTime<Utc>) -> RepoResult<()> {
        self.update(id, |m| {
            m.status = OutboxStatus::Sent;
            m.attempts += 1;
            m.sent_at = Some(at);
            m.last_error = None;
        })
    }

    async fn reschedule(
        &self,
        id: OutboxId,
        attempts: i32,
        next_attempt_at: DateTime<Utc>,
        error: &str,
    ) -> RepoResult<()> {
        self.update(id, |m| {
            m.attempts = attempts;
            m.next_attempt_at = next_attempt_at;
            m.last_error = Some(error.to_string());
        })
    }

    async fn mark_failed(&self, id: OutboxId, attempts: i32, error: &str) -> RepoResult<()> {
        self.update(id, |m| {
            m.status = OutboxStatus::Failed;
            m.attempts = attempts;
            m.last_error = Some(error.to_string());
        })
    }
}

impl InMemoryStore {
    fn update(&self, id: OutboxId, f: impl FnOnce(&mut OutboxMessage)) -> RepoResult<()> {
        let failing = self
            .outbox_update_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::DatabaseError("connection reset".to_string()));
        }

        let mut state = self.state.lock();
        let msg = state
            .outbox
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| DomainError::DatabaseError(format!("outbox message {id} missing")))?;
        f(msg);
        Ok(())
    }
}

/// Blob store that records uploads and can be told to fail
#[derive(Default)]
pub struct FakeBlobStore {
    pub uploads: Mutex<Vec<(String, String, usize)>>,
    pub fail: AtomicBool,
}

#[async_trait]
impl BlobStore for FakeBlobStore {
    async fn put(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> PortResult<String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::BlobStoreError("bucket unavailable".to_string()));
        }
        self.uploads
            .lock()
            .push((key.to_string(), content_type.to_string(), bytes.len()));
        Ok(key.to_string())
    }

    async fn presigned_get(&self, key: &str) -> PortResult<String> {
        Ok(format!("https://blobs.test/{key}?signature=test"))
    }
}

/// Notifier that records sends and fails the first `failures` calls
#[derive(Default)]
pub struct FakeNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub failures: AtomicU32,
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> PortResult<()> {
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(DomainError::NotifierError("smtp timeout".to_string()));
        }
        self.sent.lock().push((to.to_string(), subject.to_string()));
        Ok(())
    }
}

/// A service context wired to fakes
pub struct TestHarness {
    pub ctx: ServiceContext,
    pub store: Arc<InMemoryStore>,
    pub blobs: Arc<FakeBlobStore>,
    pub notifier: Arc<FakeNotifier>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::default());
        let blobs = Arc::new(FakeBlobStore::default());
        let notifier = Arc::new(FakeNotifier::default());

        let ctx = ServiceContext::builder()
            .user_repo(store.clone())
            .account_repo(store.clone())
            .post_repo(store.clone())
            .like_repo(store.clone())
            .feed_repo(store.clone())
            .outbox_repo(store.clone())
            .blob_store(blobs.clone())
            .notifier(notifier.clone())
            .session_signer(Arc::new(SessionSigner::new(TEST_SECRET, 86_400)))
            .settings(ServiceSettings {
                public_url: TEST_PUBLIC_URL.to_string(),
                account_token_ttl: chrono::Duration::hours(24),
            })
            .build()
            .unwrap();

        Self {
            ctx,
            store,
            blobs,
            notifier,
        }
    }

    /// Insert a verified, active user with the given password
    pub async fn seed_verified_user(&self, name: &str, email: &str, password: &str) -> User {
        let mut user = User::new(name.to_string(), email.to_string());
        user.mark_verified();
        self.store
            .insert_user(user.clone(), hash_password(password).unwrap());
        user
    }
}
