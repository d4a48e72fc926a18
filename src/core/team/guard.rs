//! Team-composition invariants

use crate::auth::context::ActorContext;
use crate::core::models::{MemberRole, MemberStatus, TeamMember};
use crate::storage::{DocKey, DocumentStore, WriteBatch};
use crate::utils::error::{GatewayError, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Guards role, status and removal changes.
///
/// The rank checks are pure. The last-admin check scans the organization's
/// active members and pins every admin it counted into the write batch, so a
/// concurrent demotion of the "other" admin makes one of the two commits fail.
#[derive(Clone)]
pub struct TeamGuard {
    store: Arc<dyn DocumentStore>,
}

impl TeamGuard {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// An actor may only grant roles at or below their own rank
    pub fn check_role_grant(actor: &ActorContext, role: MemberRole) -> Result<()> {
        if actor.role.can_grant(role) {
            return Ok(());
        }

        warn!(
            member_id = %actor.member_id,
            actor_role = %actor.role,
            requested_role = %role,
            "Role elevation rejected"
        );
        Err(GatewayError::elevation_denied(format!(
            "a {} cannot grant the {} role",
            actor.role, role
        )))
    }

    /// An actor may not modify a member who outranks them
    pub fn check_target_rank(actor: &ActorContext, target: &TeamMember) -> Result<()> {
        if target.role.rank() <= actor.role.rank() {
            return Ok(());
        }

        warn!(
            member_id = %actor.member_id,
            target_id = %target.id(),
            "Change to higher-ranked member rejected"
        );
        Err(GatewayError::elevation_denied(format!(
            "a {} cannot modify a {}",
            actor.role, target.role
        )))
    }

    /// Removal never targets the acting member
    pub fn check_not_self(actor: &ActorContext, target: &TeamMember) -> Result<()> {
        if actor.is_member(target.id()) {
            return Err(GatewayError::SelfActionDenied);
        }
        Ok(())
    }

    /// Whether moving `target` to `role`/`status` takes an active admin away
    pub fn removes_active_admin(
        target: &TeamMember,
        role: MemberRole,
        status: MemberStatus,
    ) -> bool {
        target.is_active_admin() && (role != MemberRole::Admin || status != MemberStatus::Active)
    }

    /// Fail with `LastAdminProtected` unless another active admin exists.
    ///
    /// Every counted admin is asserted at its read version in `batch`.
    pub async fn protect_last_admin(
        &self,
        batch: &mut WriteBatch,
        target: &TeamMember,
    ) -> Result<()> {
        let others: Vec<TeamMember> = self
            .store
            .members_by_status(target.organization_id, MemberStatus::Active)
            .await?
            .into_iter()
            .filter(|member| member.role == MemberRole::Admin && member.id() != target.id())
            .collect();

        if others.is_empty() {
            warn!(
                organization_id = %target.organization_id,
                member_id = %target.id(),
                "Change would remove the last active admin"
            );
            return Err(GatewayError::LastAdminProtected);
        }

        for admin in &others {
            batch.expect(DocKey::member(admin.id()), admin.metadata.version);
        }

        debug!(
            organization_id = %target.organization_id,
            remaining_admins = others.len(),
            "Last-admin check passed"
        );
        Ok(())
    }
}
