//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod auth;
pub mod gateway;
pub mod logging;
pub mod server;
pub mod webhooks;

// Re-export all configuration types
pub use auth::*;
pub use gateway::*;
pub use logging::*;
pub use server::*;
pub use webhooks::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

pub fn default_jwt_expiration() -> u64 {
    3600 // 1 hour
}

pub fn default_issuer() -> String {
    "crm-gateway".to_string()
}

pub fn default_webhook_timeout() -> u64 {
    10
}

pub fn default_max_concurrent_deliveries() -> usize {
    16
}

pub fn default_user_agent() -> String {
    concat!("crm-gateway/", env!("CARGO_PKG_VERSION")).to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}
