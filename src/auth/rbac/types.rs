//! RBAC type definitions

use crate::utils::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Guarded resource families. Handoffs are guarded as part of their lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Lead,
    Team,
    Webhook,
    Audit,
    Organization,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Lead,
        Resource::Team,
        Resource::Webhook,
        Resource::Audit,
        Resource::Organization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Resource::Lead => "lead",
            Resource::Team => "team",
            Resource::Webhook => "webhook",
            Resource::Audit => "audit",
            Resource::Organization => "organization",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| GatewayError::validation(format!("unknown resource '{}'", s)))
    }
}

/// Actions on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::Read,
        Action::Create,
        Action::Update,
        Action::Delete,
        Action::Manage,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Read => "read",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Manage => "manage",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| GatewayError::validation(format!("unknown action '{}'", s)))
    }
}

/// Per-member allow/deny overrides, keyed `resource → action → allowed`.
///
/// Serialized as a nested JSON object, e.g. `{"lead": {"delete": true}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionOverrides(BTreeMap<Resource, BTreeMap<Action, bool>>);

impl PermissionOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter
    pub fn with(mut self, resource: Resource, action: Action, allowed: bool) -> Self {
        self.set(resource, action, allowed);
        self
    }

    pub fn set(&mut self, resource: Resource, action: Action, allowed: bool) {
        self.0.entry(resource).or_default().insert(action, allowed);
    }

    pub fn get(&self, resource: Resource, action: Action) -> Option<bool> {
        self.0.get(&resource).and_then(|actions| actions.get(&action)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }

    /// Iterate `(resource, action, allowed)` in stable order
    pub fn iter(&self) -> impl Iterator<Item = (Resource, Action, bool)> + '_ {
        self.0.iter().flat_map(|(resource, actions)| {
            actions
                .iter()
                .map(move |(action, allowed)| (*resource, *action, *allowed))
        })
    }

    /// Parse from a schema-less JSON object, rejecting unknown keys
    pub fn from_json(value: &serde_json::Value) -> Result<Self, GatewayError> {
        let object = value
            .as_object()
            .ok_or_else(|| GatewayError::validation("permissions must be an object"))?;

        let mut overrides = Self::new();
        for (resource_key, actions) in object {
            let resource: Resource = resource_key.parse()?;
            let actions = actions.as_object().ok_or_else(|| {
                GatewayError::validation(format!("permissions.{} must be an object", resource_key))
            })?;
            for (action_key, allowed) in actions {
                let action: Action = action_key.parse()?;
                let allowed = allowed.as_bool().ok_or_else(|| {
                    GatewayError::validation(format!(
                        "permissions.{}.{} must be a boolean",
                        resource_key, action_key
                    ))
                })?;
                overrides.set(resource, action, allowed);
            }
        }
        Ok(overrides)
    }
}

/// Resolved grants for one actor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePermissionSet {
    pub(super) granted: BTreeSet<(Resource, Action)>,
}

impl EffectivePermissionSet {
    /// Whether the pair is granted
    pub fn allows(&self, resource: Resource, action: Action) -> bool {
        self.granted.contains(&(resource, action))
    }

    /// Number of granted pairs
    pub fn len(&self) -> usize {
        self.granted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.granted.is_empty()
    }

    /// Granted pairs rendered as `resource.action`, sorted
    pub fn to_strings(&self) -> Vec<String> {
        self.granted
            .iter()
            .map(|(resource, action)| format!("{}.{}", resource, action))
            .collect()
    }
}
