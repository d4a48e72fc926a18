//! Application state shared across HTTP handlers

use crate::auth::JwtHandler;
use crate::config::Config;
use crate::core::CrmCore;
use crate::storage::DocumentStore;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned once per worker; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Mutation core
    pub core: CrmCore,
    /// Bearer token issuance and verification
    pub jwt: Arc<JwtHandler>,
}

impl AppState {
    /// Wire the core and token handler from configuration
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let jwt = Arc::new(JwtHandler::new(config.auth()));
        let core = CrmCore::new(config, store)?;
        Ok(Self { core, jwt })
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        self.core.config()
    }
}
