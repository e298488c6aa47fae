//! Resend (https://resend.com) email API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, instrument};

use snap_core::{DomainError, Notifier, PortResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
}

/// Sends plain-text email through `POST {base_url}/emails`
#[derive(Clone)]
pub struct ResendNotifier {
    client: Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl ResendNotifier {
    /// Create a notifier for the given API base URL
    ///
    /// # Errors
    /// Returns `NotifierError` if the HTTP client cannot be built
    pub fn new(base_url: &str, api_key: &str, from: &str) -> PortResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::NotifierError(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/emails", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            from: from.to_string(),
        })
    }
}

impl std::fmt::Debug for ResendNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendNotifier")
            .field("endpoint", &self.endpoint)
            .field("from", &self.from)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Notifier for ResendNotifier {
    #[instrument(skip(self, body))]
    async fn send(&self, to: &str, subject: &str, body: &str) -> PortResult<()> {
        let payload = SendEmail {
            from: &self.from,
            to: [to],
            subject,
            text: body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| DomainError::NotifierError(format!("Resend request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DomainError::NotifierError(format!(
                "Resend returned {status}: {detail}"
            )));
        }

        debug!(%status, "Resend accepted email");
        Ok(())
    }
}
