//! Notifier that only logs
//!
//! For development: the message body carries single-use secrets, so only the
//! recipient and subject are logged.

use async_trait::async_trait;
use tracing::info;

use snap_core::{Notifier, PortResult};

#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> PortResult<()> {
        info!(to, subject, "Email delivered to log");
        Ok(())
    }
}
