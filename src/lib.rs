//! # CRM Gateway
//!
//! Authorization-guarded mutation core for a multi-tenant CRM.
//!
//! ## Features
//!
//! - **Role-based access**: role defaults merged with per-member overrides, checked before any write
//! - **Team invariants**: rank-bounded delegation and at least one active admin per organization
//! - **AI-to-human handoffs**: a `pending → accepted | rejected` lifecycle mirrored onto the lead
//! - **Audit trail**: write-once entries committed atomically with the change they describe
//! - **Signed webhooks**: HMAC-SHA256 signed, fire-and-forget event fan-out
//!
//! ## Library Mode
//!
//! ```rust,no_run
//! use crm_gateway::core::handoff::HandoffRequest;
//! use crm_gateway::core::organization::NewOrganization;
//! use crm_gateway::auth::ActorContext;
//! use crm_gateway::{Config, CrmCore, InMemoryStore, Lead};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryStore::new());
//!     let core = CrmCore::new(Config::default(), store)?;
//!
//!     let org = core
//!         .organizations()
//!         .create_organization(NewOrganization {
//!             name: "Acme".to_string(),
//!             admin_name: "Ada".to_string(),
//!             admin_email: None,
//!         })
//!         .await?
//!         .value;
//!     let admin = ActorContext::from_member(&org.admin);
//!
//!     let members = core.team().list_members(Some(&admin), org.organization.id()).await?;
//!     println!("{} member(s)", members.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use crm_gateway::{Config, Gateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     let gateway = Gateway::new(config)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod core;
pub mod server;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::CrmCore;
pub use core::models::{
    AuditLogEntry, Handoff, HandoffStatus, Lead, MemberRole, MemberStatus, MemberType,
    Organization, TeamMember, Webhook,
};
pub use storage::{DocumentStore, InMemoryStore};
pub use utils::error::{GatewayError, Result};

use std::sync::Arc;
use tracing::info;

/// A CRM gateway serving the mutation core over HTTP
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a gateway backed by an in-memory store
    pub fn new(config: Config) -> Result<Self> {
        Self::with_store(config, Arc::new(InMemoryStore::new()))
    }

    /// Create a gateway over an existing store
    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::HttpServer::new(config.clone(), store)?;
        Ok(Self { config, server })
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!(
            address = %self.config.server().address(),
            "Starting CRM Gateway"
        );
        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
