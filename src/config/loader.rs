//! Configuration loading utilities
//!
//! Environment variables override the built-in defaults.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

fn env_var<T: FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .parse()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

impl GatewayConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment variables");

        let mut config = Self::default();

        // Server configuration
        if let Some(host) = env_var("CRM_HOST")? {
            config.server.host = host;
        }
        if let Some(port) = env_var("CRM_PORT")? {
            config.server.port = port;
        }
        if let Some(workers) = env_var("CRM_WORKERS")? {
            config.server.workers = Some(workers);
        }

        // Auth configuration
        if let Some(secret) = env_var("CRM_JWT_SECRET")? {
            config.auth.jwt_secret = secret;
        }
        if let Some(expiration) = env_var("CRM_JWT_EXPIRATION")? {
            config.auth.jwt_expiration = expiration;
        }

        // Webhook delivery
        if let Some(timeout) = env_var("CRM_WEBHOOK_TIMEOUT_SECONDS")? {
            config.webhooks.timeout_seconds = timeout;
        }
        if let Some(max) = env_var("CRM_WEBHOOK_MAX_CONCURRENCY")? {
            config.webhooks.max_concurrent_deliveries = max;
        }
        if let Some(allow) = env_var("CRM_WEBHOOK_ALLOW_PRIVATE_TARGETS")? {
            config.webhooks.allow_private_targets = allow;
        }

        // Logging
        if let Some(level) = env_var("CRM_LOG_LEVEL")? {
            config.logging.level = level;
        }
        if let Some(json) = env_var("CRM_LOG_JSON")? {
            config.logging.json = json;
        }

        Ok(config)
    }
}
