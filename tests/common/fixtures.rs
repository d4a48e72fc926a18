//! Test fixtures
//!
//! Every fixture is a real organization bootstrapped through the public API
//! on a fresh in-memory store.

use crm_gateway::auth::ActorContext;
use crm_gateway::config::{Config, WebhooksConfig};
use crm_gateway::core::organization::NewOrganization;
use crm_gateway::core::webhooks::CreateWebhookRequest;
use crm_gateway::storage::{AuditFilter, WriteBatch};
use crm_gateway::{
    AuditLogEntry, CrmCore, DocumentStore, InMemoryStore, Lead, MemberRole, TeamMember, Webhook,
};
use std::sync::Arc;
use uuid::Uuid;

/// Configuration suitable for tests: mock endpoints live on loopback
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.gateway.webhooks = WebhooksConfig {
        timeout_seconds: 2,
        allow_private_targets: true,
        ..WebhooksConfig::default()
    };
    config
}

/// An organization with one founding admin
pub struct TestOrganization {
    pub core: CrmCore,
    pub store: Arc<InMemoryStore>,
    pub id: Uuid,
    pub admin: TeamMember,
}

impl TestOrganization {
    /// Bootstrap "Acme" with admin "Ada"
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let core = CrmCore::new(test_config(), store.clone()).unwrap();
        Self::bootstrap(core, store, "Acme").await
    }

    /// Bootstrap another organization sharing this one's store
    pub async fn sibling(&self, name: &str) -> Self {
        Self::bootstrap(self.core.clone(), self.store.clone(), name).await
    }

    async fn bootstrap(core: CrmCore, store: Arc<InMemoryStore>, name: &str) -> Self {
        let bootstrap = core
            .organizations()
            .create_organization(NewOrganization {
                name: name.to_string(),
                admin_name: "Ada".to_string(),
                admin_email: Some("ada@acme.test".to_string()),
            })
            .await
            .unwrap()
            .value;

        Self {
            core,
            store,
            id: bootstrap.organization.id(),
            admin: bootstrap.admin,
        }
    }

    /// Insert an active member directly, bypassing the team guard
    pub async fn add_member(&self, name: &str, role: MemberRole) -> TeamMember {
        let member = TeamMember::new(self.id, name, role, Some(self.admin.id()));
        let mut batch = WriteBatch::new();
        batch.insert(member.clone());
        self.store.commit(batch).await.unwrap();
        member
    }

    /// Insert a lead
    pub async fn add_lead(&self, name: &str) -> Lead {
        let lead = Lead::new(self.id, name);
        let mut batch = WriteBatch::new();
        batch.insert(lead.clone());
        self.store.commit(batch).await.unwrap();
        lead
    }

    /// Register a webhook as the admin; returns the stored record and its secret
    pub async fn add_webhook(&self, url: String, events: &[&str]) -> (Webhook, String) {
        let created = self
            .core
            .webhooks()
            .create(
                Some(&self.admin_ctx()),
                self.id,
                CreateWebhookRequest {
                    url,
                    events: events.iter().map(|e| e.to_string()).collect(),
                    is_active: None,
                },
            )
            .await
            .unwrap();
        (created.webhook, created.secret)
    }

    /// Actor context for the founding admin
    pub fn admin_ctx(&self) -> ActorContext {
        ActorContext::from_member(&self.admin)
    }

    /// Re-read a member
    pub async fn member(&self, id: Uuid) -> TeamMember {
        self.store.get_member(id).await.unwrap().unwrap()
    }

    /// Re-read a lead
    pub async fn lead(&self, id: Uuid) -> Lead {
        self.store.get_lead(id).await.unwrap().unwrap()
    }

    /// Full audit history, newest first
    pub async fn audit(&self) -> Vec<AuditLogEntry> {
        self.store
            .audit_entries(self.id, &AuditFilter::default())
            .await
            .unwrap()
    }

    /// Number of active admins
    pub async fn active_admins(&self) -> usize {
        self.store
            .members_by_organization(self.id)
            .await
            .unwrap()
            .iter()
            .filter(|member| member.is_active_admin())
            .count()
    }
}

/// Actor context for any member
pub fn ctx(member: &TeamMember) -> ActorContext {
    ActorContext::from_member(member)
}
