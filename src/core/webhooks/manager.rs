//! Webhook registration management
//!
//! Create, update and delete are admin-only regardless of permission
//! overrides.

use super::events;
use super::types::{CreateWebhookRequest, CreatedWebhook, UpdateWebhookRequest};
use crate::auth::context::ActorContext;
use crate::auth::rbac::{Action, AuthorizationResolver, Resource};
use crate::config::validation::validate_url_against_ssrf;
use crate::core::audit::{AuditDraft, AuditRecorder};
use crate::core::models::{
    AuditAction, AuditChanges, AuditEntityType, Metadata, WILDCARD_EVENT, Webhook,
};
use crate::core::outcome::MutationOutcome;
use crate::storage::{DocKey, DocumentStore, WriteBatch};
use crate::utils::error::{GatewayError, Result};
use rand::distributions::Alphanumeric;
use rand::{Rng, thread_rng};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

const SECRET_PREFIX: &str = "whsec_";
const SECRET_LENGTH: usize = 32;

/// Webhook CRUD for organization admins
#[derive(Clone)]
pub struct WebhookOperations {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
    recorder: AuditRecorder,
    allow_private_targets: bool,
}

impl WebhookOperations {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<AuthorizationResolver>,
        recorder: AuditRecorder,
        allow_private_targets: bool,
    ) -> Self {
        Self {
            store,
            resolver,
            recorder,
            allow_private_targets,
        }
    }

    /// Register a webhook. The returned secret is never shown again.
    pub async fn create(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        request: CreateWebhookRequest,
    ) -> Result<CreatedWebhook> {
        let actor = self.resolver.require_admin(
            actor,
            organization_id,
            Resource::Webhook,
            Action::Create,
        )?;

        self.validate_url(&request.url)?;
        validate_events(&request.events)?;

        let now = chrono::Utc::now();
        let secret = generate_secret();
        let webhook = Webhook {
            metadata: Metadata::at(now),
            organization_id,
            url: request.url,
            secret: secret.clone(),
            events: request.events,
            is_active: request.is_active.unwrap_or(true),
            last_triggered: None,
            last_delivered_at: None,
            created_by: Some(actor.member_id),
        };

        let mut batch = WriteBatch::new();
        batch.insert(webhook.clone());
        let draft = AuditDraft::new(AuditEntityType::Webhook, webhook.id(), AuditAction::Create)
            .changes(AuditChanges::created(snapshot(&webhook)))
            .meta("name", webhook.url.clone());
        self.recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        info!(
            organization_id = %organization_id,
            webhook_id = %webhook.id(),
            events = ?webhook.events,
            "Webhook registered"
        );
        Ok(CreatedWebhook { webhook, secret })
    }

    /// Change url, events or activation
    pub async fn update(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        webhook_id: Uuid,
        request: UpdateWebhookRequest,
    ) -> Result<MutationOutcome<Webhook>> {
        let actor = self.resolver.require_admin(
            actor,
            organization_id,
            Resource::Webhook,
            Action::Update,
        )?;

        let current = self.load(organization_id, webhook_id).await?;
        let mut webhook = current.clone();

        if let Some(url) = request.url {
            self.validate_url(&url)?;
            webhook.url = url;
        }
        if let Some(events) = request.events {
            validate_events(&events)?;
            webhook.events = events;
        }
        if let Some(is_active) = request.is_active {
            webhook.is_active = is_active;
        }

        if webhook == current {
            debug!(webhook_id = %webhook_id, "Webhook update is a no-op");
            return Ok(MutationOutcome::Unchanged(current));
        }

        let now = chrono::Utc::now();
        let expected = webhook.metadata.advance(now);

        let mut batch = WriteBatch::new();
        batch.update(webhook.clone(), expected);
        let draft = AuditDraft::new(AuditEntityType::Webhook, webhook_id, AuditAction::Update)
            .changes(AuditChanges::new(
                Some(snapshot(&current)),
                Some(snapshot(&webhook)),
            ))
            .meta("name", webhook.url.clone());
        let audit = self
            .recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        info!(organization_id = %organization_id, webhook_id = %webhook_id, "Webhook updated");
        Ok(MutationOutcome::applied(webhook, audit, None))
    }

    /// Delete a webhook registration
    pub async fn delete(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        webhook_id: Uuid,
    ) -> Result<Webhook> {
        let actor = self.resolver.require_admin(
            actor,
            organization_id,
            Resource::Webhook,
            Action::Delete,
        )?;

        let webhook = self.load(organization_id, webhook_id).await?;
        let now = chrono::Utc::now();

        let mut batch = WriteBatch::new();
        batch.delete(DocKey::webhook(webhook_id), webhook.metadata.version);
        let draft = AuditDraft::new(AuditEntityType::Webhook, webhook_id, AuditAction::Delete)
            .changes(AuditChanges::new(Some(snapshot(&webhook)), None))
            .meta("name", webhook.url.clone());
        self.recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        info!(organization_id = %organization_id, webhook_id = %webhook_id, "Webhook deleted");
        Ok(webhook)
    }

    /// Registered webhooks, secrets excluded from any serialized form
    pub async fn list(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
    ) -> Result<Vec<Webhook>> {
        self.resolver
            .require_permission(actor, organization_id, Resource::Webhook, Action::Read)?;
        self.store.webhooks_by_organization(organization_id).await
    }

    async fn load(&self, organization_id: Uuid, webhook_id: Uuid) -> Result<Webhook> {
        self.store
            .get_webhook(webhook_id)
            .await?
            .filter(|webhook| webhook.organization_id == organization_id)
            .ok_or_else(|| GatewayError::not_found(format!("webhook {}", webhook_id)))
    }

    fn validate_url(&self, url: &str) -> Result<()> {
        if self.allow_private_targets {
            let parsed = url::Url::parse(url)
                .map_err(|e| GatewayError::validation(format!("Invalid webhook URL: {}", e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(GatewayError::validation(
                    "Webhook URL must be HTTP or HTTPS",
                ));
            }
            return Ok(());
        }

        validate_url_against_ssrf(url, "Webhook").map_err(GatewayError::Validation)
    }
}

fn validate_events(subscribed: &[String]) -> Result<()> {
    if subscribed.is_empty() {
        return Err(GatewayError::validation(
            "Webhook must subscribe to at least one event",
        ));
    }

    match subscribed
        .iter()
        .find(|event| *event != WILDCARD_EVENT && !events::is_known(event))
    {
        Some(unknown) => Err(GatewayError::validation(format!(
            "Unknown webhook event '{}'",
            unknown
        ))),
        None => Ok(()),
    }
}

/// Generate a webhook signing secret
fn generate_secret() -> String {
    let random_part: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_LENGTH)
        .map(char::from)
        .collect();

    format!("{}{}", SECRET_PREFIX, random_part)
}

fn snapshot(webhook: &Webhook) -> serde_json::Value {
    json!({
        "url": webhook.url,
        "events": webhook.events,
        "isActive": webhook.is_active,
    })
}
