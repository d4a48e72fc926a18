//! Outbound webhook delivery configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Webhook delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhooksConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_webhook_timeout")]
    pub timeout_seconds: u64,
    /// Deliveries in flight per process
    #[serde(default = "default_max_concurrent_deliveries")]
    pub max_concurrent_deliveries: usize,
    /// Accept loopback and private-network targets
    #[serde(default)]
    pub allow_private_targets: bool,
    /// User-Agent sent with every delivery
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for WebhooksConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_webhook_timeout(),
            max_concurrent_deliveries: default_max_concurrent_deliveries(),
            allow_private_targets: false,
            user_agent: default_user_agent(),
        }
    }
}
