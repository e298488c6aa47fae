//! Outbox delivery worker
//!
//! Polls the email outbox, hands due messages to the notifier and records the
//! outcome. Failed sends are retried with exponential backoff until the retry
//! policy gives up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use snap_common::OutboxConfig;
use snap_core::{Notifier, OutboxMessage, OutboxRepository, RetryDecision, RetryPolicy};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// How long a claimed message stays invisible to other workers
const DEFAULT_LEASE: Duration = Duration::from_secs(300);

/// Configuration for the outbox worker
#[derive(Debug, Clone)]
pub struct OutboxWorkerConfig {
    pub poll_interval: Duration,
    pub batch_size: u32,
    pub lease: Duration,
    pub retry: RetryPolicy,
}

impl Default for OutboxWorkerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            batch_size: 20,
            lease: DEFAULT_LEASE,
            retry: RetryPolicy::default(),
        }
    }
}

impl From<&OutboxConfig> for OutboxWorkerConfig {
    fn from(config: &OutboxConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            batch_size: config.batch_size,
            lease: DEFAULT_LEASE,
            retry: RetryPolicy {
                max_attempts: config.max_attempts,
                base_backoff: Duration::from_secs(config.base_backoff_secs),
                ..RetryPolicy::default()
            },
        }
    }
}

/// Counts from one polling pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub retried: usize,
    pub failed: usize,
    /// Outcome could not be recorded; the message is retried once its lease expires
    pub errored: usize,
}

/// Background email delivery
pub struct OutboxWorker {
    repo: Arc<dyn OutboxRepository>,
    notifier: Arc<dyn Notifier>,
    config: OutboxWorkerConfig,
    running: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
}

impl OutboxWorker {
    /// Create a new worker
    pub fn new(
        repo: Arc<dyn OutboxRepository>,
        notifier: Arc<dyn Notifier>,
        config: OutboxWorkerConfig,
    ) -> Self {
        Self {
            repo,
            notifier,
            config,
            running: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Create a worker sharing the context's outbox repository and notifier
    pub fn from_context(ctx: &ServiceContext, config: OutboxWorkerConfig) -> Self {
        Self::new(ctx.outbox_repo_arc(), ctx.notifier_arc(), config)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start polling in a background task
    ///
    /// Returns `None` if the worker is already running.
    pub fn start(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if self.running.swap(true, Ordering::SeqCst) {
            warn!("Outbox worker is already running");
            return None;
        }

        let worker = Arc::clone(&self);
        let handle = tokio::spawn(async move {
            worker.run().await;
        });

        info!(
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            batch_size = self.config.batch_size,
            "Outbox worker started"
        );
        Some(handle)
    }

    /// Ask the polling loop to exit after the current pass
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.notify_one();
        info!("Outbox worker stopping");
    }

    async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        while self.running.load(Ordering::SeqCst) {
            tokio::select! {
                _ = interval.tick() => {
                    if let Err(e) = self.poll_once().await {
                        error!(error = %e, "Outbox poll failed");
                    }
                }
                () = self.shutdown.notified() => break,
            }
        }

        self.running.store(false, Ordering::SeqCst);
        info!("Outbox worker loop ended");
    }

    /// Claim and deliver one batch of due messages
    #[instrument(skip(self))]
    pub async fn poll_once(&self) -> ServiceResult<DeliveryReport> {
        let batch = self
            .repo
            .claim_due(Utc::now(), self.config.batch_size, self.config.lease)
            .await?;

        let mut report = DeliveryReport::default();
        for message in batch {
            match self.deliver(&message).await {
                Ok(Outcome::Sent) => report.sent += 1,
                Ok(Outcome::Retried) => report.retried += 1,
                Ok(Outcome::Failed) => report.failed += 1,
                Err(e) => {
                    error!(
                        outbox_id = %message.id,
                        error = %e,
                        "Failed to record delivery outcome"
                    );
                    report.errored += 1;
                }
            }
        }

        if report != DeliveryReport::default() {
            debug!(?report, "Outbox batch processed");
        }
        Ok(report)
    }

    async fn deliver(&self, message: &OutboxMessage) -> ServiceResult<Outcome> {
        let attempts = message.attempts + 1;

        let sent = self
            .notifier
            .send(&message.recipient, &message.subject, &message.body)
            .await;

        let reason = match sent {
            Ok(()) => {
                self.repo.mark_sent(message.id, Utc::now()).await?;
                info!(outbox_id = %message.id, attempts, "Email delivered");
                return Ok(Outcome::Sent);
            }
            Err(e) => e.to_string(),
        };

        match self
            .config
            .retry
            .after_failure(attempts.max(0) as u32, Utc::now())
        {
            RetryDecision::Retry { at } => {
                warn!(
                    outbox_id = %message.id,
                    attempts,
                    retry_at = %at,
                    error = %reason,
                    "Email delivery failed, will retry"
                );
                self.repo
                    .reschedule(message.id, attempts, at, &reason)
                    .await?;
                Ok(Outcome::Retried)
            }
            RetryDecision::GiveUp => {
                error!(
                    outbox_id = %message.id,
                    attempts,
                    error = %reason,
                    "Email delivery failed permanently"
                );
                self.repo.mark_failed(message.id, attempts, &reason).await?;
                Ok(Outcome::Failed)
            }
        }
    }
}

impl std::fmt::Debug for OutboxWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboxWorker")
            .field("config", &self.config)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

enum Outcome {
    Sent,
    Retried,
    Failed,
}
