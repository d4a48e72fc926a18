//! Authorization resolver core functionality

use crate::core::models::MemberRole;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::roles::role_defaults;
use super::types::{Action, EffectivePermissionSet, PermissionOverrides, Resource};

/// Computes effective permission sets and answers allow/deny queries.
///
/// Holds only the static role tables; every query is a pure function of its
/// inputs.
#[derive(Debug, Clone)]
pub struct AuthorizationResolver {
    /// Role default grants
    pub(super) roles: HashMap<MemberRole, BTreeSet<(Resource, Action)>>,
}

impl Default for AuthorizationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationResolver {
    /// Create a resolver with the built-in role tables
    pub fn new() -> Self {
        let roles = MemberRole::ALL
            .into_iter()
            .map(|role| (role, role_defaults(role).into_iter().collect()))
            .collect();

        Self { roles }
    }

    /// Merge role defaults with per-member overrides.
    ///
    /// Overrides win per `(resource, action)` pair; unspecified pairs fall back
    /// to the role default.
    pub fn resolve(
        &self,
        role: MemberRole,
        overrides: Option<&PermissionOverrides>,
    ) -> EffectivePermissionSet {
        let mut granted = self.roles.get(&role).cloned().unwrap_or_default();

        if let Some(overrides) = overrides {
            for (resource, action, allowed) in overrides.iter() {
                if allowed {
                    granted.insert((resource, action));
                } else {
                    granted.remove(&(resource, action));
                }
            }
        }

        debug!(role = %role, grants = granted.len(), "Resolved effective permission set");
        EffectivePermissionSet { granted }
    }

    /// Role default for a pair, ignoring overrides
    pub fn role_allows(&self, role: MemberRole, resource: Resource, action: Action) -> bool {
        self.roles
            .get(&role)
            .is_some_and(|grants| grants.contains(&(resource, action)))
    }
}
