//! Webhook type definitions

use crate::core::models::Webhook;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::warn;

/// Canonical delivery body. Field order is part of the wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEnvelope {
    /// Event name
    pub event: String,
    /// Epoch milliseconds at dispatch
    pub timestamp: i64,
    /// Event payload
    pub data: serde_json::Value,
}

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Active webhooks subscribed to the event
    pub matched: usize,
    /// Deliveries answered with a 2xx status
    pub delivered: usize,
    /// Deliveries that failed for any reason
    pub failed: usize,
}

/// Handle on a spawned fan-out. Dropping it detaches the task.
#[derive(Debug)]
pub struct DispatchHandle {
    inner: JoinHandle<DispatchReport>,
}

impl DispatchHandle {
    pub(super) fn new(inner: JoinHandle<DispatchReport>) -> Self {
        Self { inner }
    }

    /// Wait for the fan-out to finish
    pub async fn report(self) -> Option<DispatchReport> {
        match self.inner.await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Webhook dispatch task failed: {}", e);
                None
            }
        }
    }
}

/// Webhook registration input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWebhookRequest {
    pub url: String,
    pub events: Vec<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Partial webhook update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWebhookRequest {
    pub url: Option<String>,
    pub events: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

/// Result of a registration; the only place the secret is ever returned
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedWebhook {
    pub webhook: Webhook,
    pub secret: String,
}
