//! Explicit actor context threaded through every core operation

use crate::auth::rbac::PermissionOverrides;
use crate::core::models::{ActorType, MemberRole, MemberType, TeamMember};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The member on whose behalf an operation runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorContext {
    /// Acting member id
    pub member_id: Uuid,
    /// Organization the actor belongs to
    pub organization_id: Uuid,
    /// Actor role at resolution time
    pub role: MemberRole,
    /// Human or AI
    pub member_type: MemberType,
    /// Per-member overrides at resolution time
    pub permissions: Option<PermissionOverrides>,
}

impl ActorContext {
    /// Build the context from the member's current record
    pub fn from_member(member: &TeamMember) -> Self {
        Self {
            member_id: member.id(),
            organization_id: member.organization_id,
            role: member.role,
            member_type: member.member_type,
            permissions: member.permissions.clone(),
        }
    }

    /// Audit actor kind
    pub fn actor_type(&self) -> ActorType {
        match self.member_type {
            MemberType::Human => ActorType::Human,
            MemberType::Ai => ActorType::Ai,
        }
    }

    /// Whether the context acts for `member_id`
    pub fn is_member(&self, member_id: Uuid) -> bool {
        self.member_id == member_id
    }
}
