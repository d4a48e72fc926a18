//! Webhook models

use super::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Wildcard subscription matching every event
pub const WILDCARD_EVENT: &str = "*";

/// Organization-registered HTTP endpoint receiving signed event notifications
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    /// Webhook metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Owning organization
    pub organization_id: Uuid,
    /// Delivery URL
    pub url: String,
    /// Signing secret; never serialized outward
    #[serde(skip_serializing, default)]
    pub secret: String,
    /// Subscribed event names (may contain `*`)
    pub events: Vec<String>,
    /// Whether deliveries are enabled
    pub is_active: bool,
    /// Last delivery attempt, successful or not
    pub last_triggered: Option<chrono::DateTime<chrono::Utc>>,
    /// Last delivery answered with a 2xx status
    pub last_delivered_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Member who registered the webhook
    pub created_by: Option<Uuid>,
}

impl Webhook {
    /// Webhook id
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    /// Whether this webhook is subscribed to `event`
    pub fn subscribes_to(&self, event: &str) -> bool {
        self.events
            .iter()
            .any(|subscribed| subscribed == event || subscribed == WILDCARD_EVENT)
    }

    /// Whether an event should be delivered to this webhook
    pub fn should_receive(&self, event: &str) -> bool {
        self.is_active && self.subscribes_to(event)
    }
}

impl fmt::Debug for Webhook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webhook")
            .field("id", &self.metadata.id)
            .field("organization_id", &self.organization_id)
            .field("url", &self.url)
            .field("secret", &"[REDACTED]")
            .field("events", &self.events)
            .field("is_active", &self.is_active)
            .field("last_triggered", &self.last_triggered)
            .finish()
    }
}
