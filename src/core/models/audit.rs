//! Audit log models

use super::AttributeMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Append-only record of a state change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Entry id
    pub id: Uuid,
    /// Owning organization
    pub organization_id: Uuid,
    /// Kind of entity that changed
    pub entity_type: AuditEntityType,
    /// Id of the entity that changed
    pub entity_id: Uuid,
    /// What happened
    pub action: AuditAction,
    /// Acting member, `None` for system actions
    pub actor_id: Option<Uuid>,
    /// Kind of actor
    pub actor_type: ActorType,
    /// Before/after snapshot of the changed fields
    pub changes: AuditChanges,
    /// Extra structured context
    #[serde(default)]
    pub metadata: AttributeMap,
    /// Severity assigned by the caller
    pub severity: Severity,
    /// Deterministic human-readable description
    pub description: String,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Before/after diff
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditChanges {
    pub fn new(before: Option<serde_json::Value>, after: Option<serde_json::Value>) -> Self {
        Self { before, after }
    }

    pub fn created(after: serde_json::Value) -> Self {
        Self::new(None, Some(after))
    }

    /// Keep only the top-level keys whose value differs between two snapshots
    pub fn diff(before: &serde_json::Value, after: &serde_json::Value) -> Self {
        let (Some(before), Some(after)) = (before.as_object(), after.as_object()) else {
            return Self::new(Some(before.clone()), Some(after.clone()));
        };

        let mut changed_before = serde_json::Map::new();
        let mut changed_after = serde_json::Map::new();
        for key in before.keys().chain(after.keys()) {
            let old = before.get(key).cloned().unwrap_or(serde_json::Value::Null);
            let new = after.get(key).cloned().unwrap_or(serde_json::Value::Null);
            if old != new {
                changed_before.insert(key.clone(), old);
                changed_after.insert(key.clone(), new);
            }
        }

        Self::new(
            Some(serde_json::Value::Object(changed_before)),
            Some(serde_json::Value::Object(changed_after)),
        )
    }
}

/// Audited entity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEntityType {
    Organization,
    TeamMember,
    Lead,
    Handoff,
    Webhook,
}

impl AuditEntityType {
    /// Human label used in descriptions
    pub fn label(self) -> &'static str {
        match self {
            AuditEntityType::Organization => "organization",
            AuditEntityType::TeamMember => "team member",
            AuditEntityType::Lead => "lead",
            AuditEntityType::Handoff => "handoff",
            AuditEntityType::Webhook => "webhook",
        }
    }
}

/// Audited actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Create,
    Update,
    RoleChange,
    PermissionChange,
    StatusChange,
    Remove,
    Reactivate,
    Handoff,
    Delete,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::RoleChange => "role_change",
            AuditAction::PermissionChange => "permission_change",
            AuditAction::StatusChange => "status_change",
            AuditAction::Remove => "remove",
            AuditAction::Reactivate => "reactivate",
            AuditAction::Handoff => "handoff",
            AuditAction::Delete => "delete",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Actor kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    Human,
    Ai,
    System,
}

/// Audit severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}
