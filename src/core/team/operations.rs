//! Team member mutations

use super::email::validate_email;
use super::guard::TeamGuard;
use super::types::{NewMember, UpdateMember};
use crate::auth::context::ActorContext;
use crate::auth::rbac::{Action, AuthorizationResolver, PermissionOverrides, Resource};
use crate::core::audit::{AuditDraft, AuditRecorder};
use crate::core::models::{
    AuditAction, AuditChanges, AuditEntityType, MemberStatus, Metadata, TeamMember,
};
use crate::core::outcome::{Committed, MutationOutcome};
use crate::core::webhooks::{WebhookDispatcher, events};
use crate::storage::{DocumentStore, WriteBatch};
use crate::utils::error::{GatewayError, Result};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Team member operations
#[derive(Clone)]
pub struct TeamOperations {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
    guard: TeamGuard,
    recorder: AuditRecorder,
    dispatcher: WebhookDispatcher,
}

impl TeamOperations {
    /// Create new team operations handler
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<AuthorizationResolver>,
        recorder: AuditRecorder,
        dispatcher: WebhookDispatcher,
    ) -> Self {
        Self {
            guard: TeamGuard::new(store.clone()),
            store,
            resolver,
            recorder,
            dispatcher,
        }
    }

    /// Members of the organization
    pub async fn list_members(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
    ) -> Result<Vec<TeamMember>> {
        self.resolver
            .require_permission(actor, organization_id, Resource::Team, Action::Read)?;
        self.store.members_by_organization(organization_id).await
    }

    /// Invite or create a member
    pub async fn create_member(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        input: NewMember,
    ) -> Result<Committed<TeamMember>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Team,
            Action::Create,
        )?;

        let name = validate_name(&input.name)?;
        TeamGuard::check_role_grant(actor, input.role)?;
        if let Some(member_type) = input.member_type {
            if member_type != input.role.implied_type() {
                return Err(GatewayError::validation(format!(
                    "role {} requires type {}",
                    input.role,
                    input.role.implied_type().as_str()
                )));
            }
        }
        let permissions = self.grantable(actor, input.permissions)?;

        let now = chrono::Utc::now();
        let mut member = TeamMember::new(organization_id, name, input.role, Some(actor.member_id));
        member.metadata = Metadata::at(now);
        member.email = input.email.as_deref().map(validate_email).transpose()?;
        member.permissions = permissions;

        let mut batch = WriteBatch::new();
        batch.insert(member.clone());
        let draft = AuditDraft::new(AuditEntityType::TeamMember, member.id(), AuditAction::Create)
            .changes(AuditChanges::created(snapshot(&member)))
            .meta("name", member.name.clone());
        let audit = self
            .recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        let dispatch = self.dispatcher.trigger(
            organization_id,
            events::TEAM_MEMBER_CREATED,
            events::team_member(&member, &[]),
        );

        info!(
            organization_id = %organization_id,
            member_id = %member.id(),
            role = %member.role,
            "Team member created"
        );
        Ok(Committed {
            value: member,
            audit,
            dispatch: Some(dispatch),
        })
    }

    /// Change name, email, role or permission overrides
    pub async fn update_member(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        member_id: Uuid,
        input: UpdateMember,
    ) -> Result<MutationOutcome<TeamMember>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Team,
            Action::Update,
        )?;

        let current = self.load(organization_id, member_id).await?;
        TeamGuard::check_target_rank(actor, &current)?;

        let mut updated = current.clone();
        if let Some(name) = &input.name {
            updated.name = validate_name(name)?;
        }
        if let Some(email) = &input.email {
            updated.email = Some(validate_email(email)?);
        }
        if let Some(role) = input.role {
            if role != current.role {
                TeamGuard::check_role_grant(actor, role)?;
                if role.implied_type() != current.member_type {
                    return Err(GatewayError::validation(format!(
                        "a {} member cannot take the {} role",
                        current.member_type.as_str(),
                        role
                    )));
                }
            }
            updated.role = role;
        }
        if input.permissions.is_some() {
            updated.permissions = self.grantable(actor, input.permissions)?;
        }

        if snapshot(&updated) == snapshot(&current) {
            debug!(member_id = %member_id, "Member update is a no-op");
            return Ok(MutationOutcome::Unchanged(current));
        }

        let mut batch = WriteBatch::new();
        if TeamGuard::removes_active_admin(&current, updated.role, updated.status) {
            self.guard.protect_last_admin(&mut batch, &current).await?;
        }

        let action = if updated.role != current.role {
            AuditAction::RoleChange
        } else if updated.permissions != current.permissions {
            AuditAction::PermissionChange
        } else {
            AuditAction::Update
        };

        self.apply(batch, actor, &current, updated, action, events::TEAM_MEMBER_UPDATED)
            .await
    }

    /// Set a member's availability (`active` or `busy`)
    pub async fn update_status(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        member_id: Uuid,
        status: MemberStatus,
    ) -> Result<MutationOutcome<TeamMember>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Team,
            Action::Update,
        )?;

        let current = self.load(organization_id, member_id).await?;
        TeamGuard::check_target_rank(actor, &current)?;

        if status == current.status {
            debug!(member_id = %member_id, status = %status, "Member already in status");
            return Ok(MutationOutcome::Unchanged(current));
        }
        if status == MemberStatus::Inactive {
            return Err(GatewayError::validation(
                "members are deactivated through removal",
            ));
        }
        if current.status == MemberStatus::Inactive {
            return Err(GatewayError::validation(
                "inactive members must be reactivated first",
            ));
        }

        let mut batch = WriteBatch::new();
        if TeamGuard::removes_active_admin(&current, current.role, status) {
            self.guard.protect_last_admin(&mut batch, &current).await?;
        }

        let mut updated = current.clone();
        updated.status = status;
        self.apply(
            batch,
            actor,
            &current,
            updated,
            AuditAction::StatusChange,
            events::TEAM_MEMBER_UPDATED,
        )
        .await
    }

    /// Deactivate a member; members are never hard-deleted
    pub async fn remove_member(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<MutationOutcome<TeamMember>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Team,
            Action::Delete,
        )?;

        let current = self.load(organization_id, member_id).await?;
        TeamGuard::check_not_self(actor, &current)?;
        TeamGuard::check_target_rank(actor, &current)?;

        if current.status == MemberStatus::Inactive {
            debug!(member_id = %member_id, "Member already removed");
            return Ok(MutationOutcome::Unchanged(current));
        }

        let mut batch = WriteBatch::new();
        if TeamGuard::removes_active_admin(&current, current.role, MemberStatus::Inactive) {
            self.guard.protect_last_admin(&mut batch, &current).await?;
        }

        let mut updated = current.clone();
        updated.status = MemberStatus::Inactive;
        self.apply(
            batch,
            actor,
            &current,
            updated,
            AuditAction::Remove,
            events::TEAM_MEMBER_REMOVED,
        )
        .await
    }

    /// Bring a removed member back as active
    pub async fn reactivate_member(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        member_id: Uuid,
    ) -> Result<MutationOutcome<TeamMember>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Team,
            Action::Update,
        )?;

        let current = self.load(organization_id, member_id).await?;
        TeamGuard::check_target_rank(actor, &current)?;

        if current.status != MemberStatus::Inactive {
            debug!(member_id = %member_id, "Member is not removed");
            return Ok(MutationOutcome::Unchanged(current));
        }

        let mut updated = current.clone();
        updated.status = MemberStatus::Active;
        self.apply(
            WriteBatch::new(),
            actor,
            &current,
            updated,
            AuditAction::Reactivate,
            events::TEAM_MEMBER_REACTIVATED,
        )
        .await
    }

    /// Stage the member write with its audit entry, commit, then fan out
    async fn apply(
        &self,
        mut batch: WriteBatch,
        actor: &ActorContext,
        current: &TeamMember,
        mut updated: TeamMember,
        action: AuditAction,
        event: &str,
    ) -> Result<MutationOutcome<TeamMember>> {
        let organization_id = updated.organization_id;
        let now = chrono::Utc::now();
        let expected = updated.metadata.advance(now);
        batch.update(updated.clone(), expected);

        let changes = AuditChanges::diff(&snapshot(current), &snapshot(&updated));
        let changed: Vec<String> = changes
            .after
            .as_ref()
            .and_then(|after| after.as_object())
            .map(|after| after.keys().cloned().collect())
            .unwrap_or_default();

        let draft = AuditDraft::new(AuditEntityType::TeamMember, updated.id(), action)
            .changes(changes)
            .meta("name", updated.name.clone());
        let audit = self
            .recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        let dispatch = self.dispatcher.trigger(
            organization_id,
            event,
            events::team_member(&updated, &changed),
        );

        info!(
            organization_id = %organization_id,
            member_id = %updated.id(),
            action = %action,
            "Team member changed"
        );
        Ok(MutationOutcome::applied(updated, audit, Some(dispatch)))
    }

    async fn load(&self, organization_id: Uuid, member_id: Uuid) -> Result<TeamMember> {
        self.store
            .get_member(member_id)
            .await?
            .filter(|member| member.organization_id == organization_id)
            .ok_or_else(|| GatewayError::not_found(format!("team member {}", member_id)))
    }

    /// Validate overrides against the actor's own grants; empty clears
    fn grantable(
        &self,
        actor: &ActorContext,
        overrides: Option<PermissionOverrides>,
    ) -> Result<Option<PermissionOverrides>> {
        let Some(overrides) = overrides else {
            return Ok(None);
        };
        if overrides.is_empty() {
            return Ok(None);
        }

        let granter = self.resolver.resolve(actor.role, actor.permissions.as_ref());
        self.resolver.ensure_grantable(&granter, &overrides)?;
        Ok(Some(overrides))
    }
}

fn validate_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(GatewayError::validation("name cannot be empty"));
    }
    Ok(name.to_string())
}

fn snapshot(member: &TeamMember) -> serde_json::Value {
    json!({
        "name": member.name,
        "email": member.email,
        "role": member.role,
        "type": member.member_type,
        "status": member.status,
        "permissions": member.permissions,
    })
}
