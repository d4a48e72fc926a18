//! Permission checking methods

use crate::auth::context::ActorContext;
use crate::core::models::MemberRole;
use crate::utils::error::{GatewayError, Result};
use tracing::warn;
use uuid::Uuid;

use super::system::AuthorizationResolver;
use super::types::{Action, EffectivePermissionSet, Resource};

impl AuthorizationResolver {
    /// Allow/deny query against a resolved set
    pub fn has(&self, set: &EffectivePermissionSet, resource: Resource, action: Action) -> bool {
        set.allows(resource, action)
    }

    /// String-keyed query; unknown resources or actions are denied
    pub fn has_named(&self, set: &EffectivePermissionSet, resource: &str, action: &str) -> bool {
        match (resource.parse::<Resource>(), action.parse::<Action>()) {
            (Ok(resource), Ok(action)) => set.allows(resource, action),
            _ => false,
        }
    }

    /// Require an authenticated actor that belongs to `organization_id`
    pub fn require_auth<'a>(
        &self,
        actor: Option<&'a ActorContext>,
        organization_id: Uuid,
    ) -> Result<&'a ActorContext> {
        let actor = actor.ok_or(GatewayError::AuthenticationRequired)?;

        if actor.organization_id != organization_id {
            warn!(
                member_id = %actor.member_id,
                actor_organization = %actor.organization_id,
                requested_organization = %organization_id,
                "Cross-organization access rejected"
            );
            return Err(GatewayError::OrganizationMismatch);
        }

        Ok(actor)
    }

    /// Require authentication plus a granted `(resource, action)` pair
    pub fn require_permission<'a>(
        &self,
        actor: Option<&'a ActorContext>,
        organization_id: Uuid,
        resource: Resource,
        action: Action,
    ) -> Result<&'a ActorContext> {
        let actor = self.require_auth(actor, organization_id)?;
        let set = self.resolve(actor.role, actor.permissions.as_ref());

        if !self.has(&set, resource, action) {
            warn!(
                member_id = %actor.member_id,
                role = %actor.role,
                resource = %resource,
                action = %action,
                "Permission denied"
            );
            return Err(GatewayError::permission_denied(resource, action));
        }

        Ok(actor)
    }

    /// Require an admin actor regardless of overrides (webhook management)
    pub fn require_admin<'a>(
        &self,
        actor: Option<&'a ActorContext>,
        organization_id: Uuid,
        resource: Resource,
        action: Action,
    ) -> Result<&'a ActorContext> {
        let actor = self.require_auth(actor, organization_id)?;

        if actor.role != MemberRole::Admin {
            warn!(
                member_id = %actor.member_id,
                role = %actor.role,
                resource = %resource,
                "Admin-only operation rejected"
            );
            return Err(GatewayError::permission_denied(resource, action));
        }

        Ok(actor)
    }
}
