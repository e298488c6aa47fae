//! # snap-mail
//!
//! [`Notifier`](snap_core::Notifier) adapters. Delivery is driven by the
//! outbox worker, so adapters only need to report success or failure.

mod log;
mod resend;

use std::sync::Arc;

use snap_common::{MailConfig, MailProvider};
use snap_core::{DomainError, Notifier};

pub use log::LogNotifier;
pub use resend::ResendNotifier;

/// Build the adapter selected by `config.provider`
///
/// # Errors
/// Returns `NotifierError` if Resend is selected without an API key
pub fn from_config(config: &MailConfig) -> Result<Arc<dyn Notifier>, DomainError> {
    let notifier: Arc<dyn Notifier> = match config.provider {
        MailProvider::Log => Arc::new(LogNotifier::new()),
        MailProvider::Resend => {
            let api_key = config.resend_api_key.as_deref().ok_or_else(|| {
                DomainError::NotifierError("Resend selected without RESEND_API_KEY".to_string())
            })?;
            Arc::new(ResendNotifier::new(
                &config.resend_base_url,
                api_key,
                &config.from,
            )?)
        }
    };
    Ok(notifier)
}
