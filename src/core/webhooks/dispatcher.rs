//! Webhook fan-out
//!
//! Selection, signing and delivery of one event to every matching endpoint.
//! Each delivery is independent: a failure is logged and recorded and never
//! stops the others.

use super::signature::{EVENT_HEADER, SIGNATURE_HEADER, signature_header};
use super::types::{DispatchHandle, DispatchReport, WebhookEnvelope};
use crate::config::WebhooksConfig;
use crate::core::models::Webhook;
use crate::storage::DocumentStore;
use crate::utils::error::{GatewayError, Result};
use futures::future::join_all;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use uuid::Uuid;

/// Asynchronous, at-most-once webhook dispatcher
#[derive(Clone)]
pub struct WebhookDispatcher {
    store: Arc<dyn DocumentStore>,
    /// HTTP client carrying the bounded delivery timeout
    client: Client,
    /// Bounds deliveries in flight across all fan-outs
    permits: Arc<Semaphore>,
}

impl WebhookDispatcher {
    /// Create a new dispatcher
    pub fn new(store: Arc<dyn DocumentStore>, config: &WebhooksConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(GatewayError::HttpClient)?;

        Ok(Self {
            store,
            client,
            permits: Arc::new(Semaphore::new(config.max_concurrent_deliveries)),
        })
    }

    /// Schedule a fan-out on its own task and return immediately
    pub fn trigger(
        &self,
        organization_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> DispatchHandle {
        let dispatcher = self.clone();
        let event = event.to_string();

        DispatchHandle::new(tokio::spawn(async move {
            dispatcher.dispatch(organization_id, &event, payload).await
        }))
    }

    /// Deliver an event to every active subscribed webhook of the organization
    pub async fn dispatch(
        &self,
        organization_id: Uuid,
        event: &str,
        payload: serde_json::Value,
    ) -> DispatchReport {
        let webhooks = match self.store.webhooks_by_organization(organization_id).await {
            Ok(webhooks) => webhooks,
            Err(e) => {
                warn!(organization_id = %organization_id, event, "Failed to load webhooks: {}", e);
                return DispatchReport::default();
            }
        };

        let matched: Vec<Webhook> = webhooks
            .into_iter()
            .filter(|webhook| webhook.should_receive(event))
            .collect();

        if matched.is_empty() {
            debug!(organization_id = %organization_id, event, "No webhooks subscribed");
            return DispatchReport::default();
        }

        let envelope = WebhookEnvelope {
            event: event.to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            data: payload,
        };
        let body = match serde_json::to_vec(&envelope) {
            Ok(body) => body,
            Err(e) => {
                warn!(event, "Failed to serialize webhook body: {}", e);
                return DispatchReport {
                    matched: matched.len(),
                    delivered: 0,
                    failed: matched.len(),
                };
            }
        };

        let outcomes = join_all(
            matched
                .iter()
                .map(|webhook| self.deliver(webhook, event, &body)),
        )
        .await;

        let delivered = outcomes.iter().filter(|ok| **ok).count();
        let report = DispatchReport {
            matched: matched.len(),
            delivered,
            failed: matched.len() - delivered,
        };

        debug!(
            organization_id = %organization_id,
            event,
            matched = report.matched,
            delivered = report.delivered,
            "Webhook fan-out finished"
        );
        report
    }

    /// Deliver to one webhook and record the attempt
    async fn deliver(&self, webhook: &Webhook, event: &str, body: &[u8]) -> bool {
        let delivered = match self.post(webhook, event, body).await {
            Ok(status) if status.is_success() => {
                debug!(webhook_id = %webhook.id(), event, "Webhook delivered");
                true
            }
            Ok(status) => {
                warn!(
                    webhook_id = %webhook.id(),
                    event,
                    status = status.as_u16(),
                    "Webhook endpoint returned non-success status"
                );
                false
            }
            Err(e) => {
                warn!(webhook_id = %webhook.id(), event, "Webhook delivery failed: {}", e);
                false
            }
        };

        if let Err(e) = self
            .store
            .record_webhook_attempt(webhook.id(), chrono::Utc::now(), delivered)
            .await
        {
            warn!(webhook_id = %webhook.id(), "Failed to record webhook attempt: {}", e);
        }

        delivered
    }

    async fn post(&self, webhook: &Webhook, event: &str, body: &[u8]) -> Result<StatusCode> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| GatewayError::internal(format!("Delivery pool closed: {}", e)))?;

        let signature = signature_header(&webhook.secret, body)?;

        let response = self
            .client
            .post(&webhook.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .header(EVENT_HEADER, event)
            .body(body.to_vec())
            .send()
            .await?;

        Ok(response.status())
    }
}
