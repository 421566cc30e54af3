//! Submission forwarder — relays survey answers to the upstream collection
//! service.
//!
//! One outbound POST per submission, no retries. Both the `/api/survey`
//! route and finished wizard sessions go through the same `Forwarder`.

pub mod routes;

use std::sync::Arc;

use serde_json::Value;

use crate::error::ForwardError;
use crate::survey::{SubmissionDispatcher, SubmissionPayload};

pub use routes::{FAILURE_MESSAGE, submission_routes};

/// Path appended to the upstream base URL.
const UPSTREAM_PATH: &str = "/survey";

/// Stateless relay to `{base_url}/survey`.
#[derive(Debug, Clone)]
pub struct Forwarder {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl Forwarder {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
            client: reqwest::Client::new(),
        }
    }

    /// Full upstream URL, if a base is configured.
    pub fn upstream_url(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{base}{UPSTREAM_PATH}"))
    }

    /// POST `body` verbatim as JSON and return the upstream's JSON reply.
    pub async fn forward(&self, body: &Value) -> Result<Value, ForwardError> {
        let url = self.upstream_url().ok_or(ForwardError::NotConfigured)?;

        let resp = self.client.post(&url).json(body).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ForwardError::UpstreamStatus { status });
        }

        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Dispatches finished wizard payloads through a `Forwarder` on a spawned
/// task. The outcome is only logged.
#[derive(Clone)]
pub struct ForwardingDispatcher {
    forwarder: Arc<Forwarder>,
}

impl ForwardingDispatcher {
    pub fn new(forwarder: Arc<Forwarder>) -> Self {
        Self { forwarder }
    }
}

impl SubmissionDispatcher for ForwardingDispatcher {
    fn dispatch(&self, payload: SubmissionPayload) {
        let forwarder = Arc::clone(&self.forwarder);
        tokio::spawn(async move {
            let body = match serde_json::to_value(&payload) {
                Ok(body) => body,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to serialize survey submission");
                    return;
                }
            };
            match forwarder.forward(&body).await {
                Ok(_) => tracing::info!("Survey submission forwarded"),
                Err(e) => tracing::error!(error = %e, "Survey submission failed"),
            }
        });
    }
}
