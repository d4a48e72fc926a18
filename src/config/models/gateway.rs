//! Main gateway configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound webhook delivery
    #[serde(default)]
    pub webhooks: WebhooksConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}
