//! Core functionality for the CRM gateway
//!
//! This module contains the mutation core: team management, the handoff
//! lifecycle, audit recording and webhook fan-out.

pub mod audit;
pub mod handoff;
pub mod models;
pub mod organization;
pub mod outcome;
pub mod team;
pub mod webhooks;

use crate::auth::AuthorizationResolver;
use crate::config::Config;
use crate::storage::DocumentStore;
use crate::utils::error::Result;
use audit::AuditRecorder;
use handoff::HandoffCoordinator;
use organization::OrganizationService;
use std::sync::Arc;
use team::TeamOperations;
use tracing::{debug, info};
use webhooks::{WebhookDispatcher, WebhookOperations};

/// Every core component wired to one store
#[derive(Clone)]
pub struct CrmCore {
    /// Gateway configuration
    config: Arc<Config>,
    /// Storage collaborator
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
    recorder: AuditRecorder,
    dispatcher: WebhookDispatcher,
    team: TeamOperations,
    handoffs: HandoffCoordinator,
    webhooks: WebhookOperations,
    organizations: OrganizationService,
}

impl CrmCore {
    /// Wire the core components
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Result<Self> {
        info!("Initializing CRM core");
        let config = Arc::new(config);

        let resolver = Arc::new(AuthorizationResolver::new());
        let recorder = AuditRecorder::new(store.clone(), resolver.clone());

        debug!("Initializing webhook dispatcher");
        let dispatcher = WebhookDispatcher::new(store.clone(), config.webhooks())?;

        let team = TeamOperations::new(
            store.clone(),
            resolver.clone(),
            recorder.clone(),
            dispatcher.clone(),
        );
        let handoffs = HandoffCoordinator::new(
            store.clone(),
            resolver.clone(),
            recorder.clone(),
            dispatcher.clone(),
        );
        let webhooks = WebhookOperations::new(
            store.clone(),
            resolver.clone(),
            recorder.clone(),
            config.webhooks().allow_private_targets,
        );
        let organizations =
            OrganizationService::new(store.clone(), resolver.clone(), recorder.clone());

        info!("CRM core initialized successfully");
        Ok(Self {
            config,
            store,
            resolver,
            recorder,
            dispatcher,
            team,
            handoffs,
            webhooks,
            organizations,
        })
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the storage collaborator
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn resolver(&self) -> &AuthorizationResolver {
        &self.resolver
    }

    pub fn audit(&self) -> &AuditRecorder {
        &self.recorder
    }

    pub fn dispatcher(&self) -> &WebhookDispatcher {
        &self.dispatcher
    }

    pub fn team(&self) -> &TeamOperations {
        &self.team
    }

    pub fn handoffs(&self) -> &HandoffCoordinator {
        &self.handoffs
    }

    pub fn webhooks(&self) -> &WebhookOperations {
        &self.webhooks
    }

    pub fn organizations(&self) -> &OrganizationService {
        &self.organizations
    }
}
