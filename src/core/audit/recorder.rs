//! Audit recorder

use super::describe::describe;
use crate::auth::context::ActorContext;
use crate::auth::rbac::{Action, AuthorizationResolver, Resource};
use crate::core::models::{
    ActorType, AttributeMap, AuditAction, AuditChanges, AuditEntityType, AuditLogEntry, Severity,
};
use crate::storage::{AuditFilter, DocumentStore, WriteBatch};
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// Everything the caller decides about an audit entry
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub entity_type: AuditEntityType,
    pub entity_id: Uuid,
    pub action: AuditAction,
    pub changes: AuditChanges,
    pub metadata: AttributeMap,
    pub severity: Severity,
}

impl AuditDraft {
    /// Start a draft with the default severity for `action`
    pub fn new(entity_type: AuditEntityType, entity_id: Uuid, action: AuditAction) -> Self {
        Self {
            entity_type,
            entity_id,
            action,
            changes: AuditChanges::default(),
            metadata: AttributeMap::new(),
            severity: Self::default_severity(action),
        }
    }

    /// Role and permission changes and removals are high, toggles are low
    pub fn default_severity(action: AuditAction) -> Severity {
        match action {
            AuditAction::RoleChange
            | AuditAction::PermissionChange
            | AuditAction::Remove
            | AuditAction::Delete => Severity::High,
            AuditAction::Create | AuditAction::Reactivate | AuditAction::Handoff => {
                Severity::Medium
            }
            AuditAction::Update | AuditAction::StatusChange => Severity::Low,
        }
    }

    pub fn changes(mut self, changes: AuditChanges) -> Self {
        self.changes = changes;
        self
    }

    pub fn meta(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

/// Builds, stages and reads audit entries
#[derive(Clone)]
pub struct AuditRecorder {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn DocumentStore>, resolver: Arc<AuthorizationResolver>) -> Self {
        Self { store, resolver }
    }

    /// Materialize a draft. `None` records a system action.
    pub fn entry(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        draft: AuditDraft,
        now: DateTime<Utc>,
    ) -> AuditLogEntry {
        let description = describe(draft.action, draft.entity_type, &draft.changes, &draft.metadata);

        AuditLogEntry {
            id: Uuid::new_v4(),
            organization_id,
            entity_type: draft.entity_type,
            entity_id: draft.entity_id,
            action: draft.action,
            actor_id: actor.map(|a| a.member_id),
            actor_type: actor.map_or(ActorType::System, ActorContext::actor_type),
            changes: draft.changes,
            metadata: draft.metadata,
            severity: draft.severity,
            description,
            created_at: now,
        }
    }

    /// Stage an entry into the batch carrying the change it describes
    pub fn stage(
        &self,
        batch: &mut WriteBatch,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        draft: AuditDraft,
        now: DateTime<Utc>,
    ) -> AuditLogEntry {
        let entry = self.entry(actor, organization_id, draft, now);
        batch.insert(entry.clone());
        entry
    }

    /// Write one entry on its own
    pub async fn append(&self, entry: AuditLogEntry) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.insert(entry.clone());
        self.store.commit(batch).await?;

        debug!(
            organization_id = %entry.organization_id,
            action = %entry.action,
            "Appended audit entry"
        );
        Ok(())
    }

    /// Audit history of an organization, newest first
    pub async fn history(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditLogEntry>> {
        self.resolver
            .require_permission(actor, organization_id, Resource::Audit, Action::Read)?;
        self.store.audit_entries(organization_id, filter).await
    }
}
