//! Handoff coordinator

use crate::auth::context::ActorContext;
use crate::auth::rbac::{Action, AuthorizationResolver, Resource};
use crate::core::audit::{AuditDraft, AuditRecorder};
use crate::core::models::{
    AuditAction, AuditChanges, AuditEntityType, AuditLogEntry, Handoff, HandoffProjectionStatus,
    HandoffState, HandoffStatus, Lead, Metadata,
};
use crate::core::outcome::Committed;
use crate::core::webhooks::{WebhookDispatcher, events};
use crate::storage::{DocumentStore, WriteBatch};
use crate::utils::error::{GatewayError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Handoff request input
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffRequest {
    pub reason: String,
    #[serde(default)]
    pub to_member_id: Option<Uuid>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

impl HandoffRequest {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            ..Default::default()
        }
    }
}

/// A checked handoff request, ready to commit
pub(super) struct StagedRequest {
    /// Handoff insert, lead update at its read version, audit entry
    pub(super) batch: WriteBatch,
    pub(super) handoff: Handoff,
    pub(super) lead: Lead,
    pub(super) audit: AuditLogEntry,
}

/// Drives `pending → accepted | rejected` and keeps `Lead.handoffState` in step
#[derive(Clone)]
pub struct HandoffCoordinator {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
    recorder: AuditRecorder,
    dispatcher: WebhookDispatcher,
}

impl HandoffCoordinator {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<AuthorizationResolver>,
        recorder: AuditRecorder,
        dispatcher: WebhookDispatcher,
    ) -> Self {
        Self {
            store,
            resolver,
            recorder,
            dispatcher,
        }
    }

    /// Ask for a lead to be taken over.
    ///
    /// Fails with `AlreadyInState` while the lead has an active handoff. The
    /// lead's read version is asserted at commit, so of two racing requests
    /// only one can win.
    pub async fn request_handoff(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        lead_id: Uuid,
        request: HandoffRequest,
    ) -> Result<Committed<Handoff>> {
        let StagedRequest {
            batch,
            handoff,
            lead,
            audit,
        } = self
            .stage_request(actor, organization_id, lead_id, request)
            .await?;
        self.store.commit(batch).await?;

        let dispatch = self.dispatcher.trigger(
            organization_id,
            events::LEAD_HANDOFF_REQUESTED,
            events::handoff(&handoff, &lead),
        );

        info!(
            organization_id = %organization_id,
            lead_id = %lead_id,
            handoff_id = %handoff.id(),
            "Handoff requested"
        );
        Ok(Committed {
            value: handoff,
            audit,
            dispatch: Some(dispatch),
        })
    }

    /// Run every check and build the request's write batch without committing it
    pub(super) async fn stage_request(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        lead_id: Uuid,
        request: HandoffRequest,
    ) -> Result<StagedRequest> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Lead,
            Action::Create,
        )?;

        let reason = request.reason.trim();
        if reason.is_empty() {
            return Err(GatewayError::validation("handoff reason cannot be empty"));
        }

        let mut lead = self.load_lead(organization_id, lead_id).await?;
        if let Some(to_member_id) = request.to_member_id {
            self.check_recipient(organization_id, to_member_id).await?;
        }
        if lead.has_active_handoff() {
            warn!(lead_id = %lead_id, "Lead already has an active handoff");
            return Err(GatewayError::already_in_state(format!(
                "lead {} already has a pending handoff",
                lead_id
            )));
        }

        let now = Utc::now();
        let handoff = Handoff {
            metadata: Metadata::at(now),
            organization_id,
            lead_id,
            from_member_id: actor.member_id,
            to_member_id: request.to_member_id,
            reason: reason.to_string(),
            summary: request.summary,
            suggested_actions: request.suggested_actions,
            status: HandoffStatus::Pending,
            accepted_by: None,
            resolved_by: None,
            resolved_at: None,
            notes: None,
        };

        let before = lead.handoff_state.clone();
        lead.handoff_state = Some(HandoffState {
            status: HandoffProjectionStatus::Pending,
            handoff_id: handoff.id(),
            from_member_id: actor.member_id,
            to_member_id: None,
            reason: handoff.reason.clone(),
            summary: handoff.summary.clone(),
            suggested_actions: handoff.suggested_actions.clone(),
            requested_at: now,
            completed_at: None,
            resolved_by: None,
            notes: None,
        });
        let expected = lead.metadata.advance(now);

        let mut batch = WriteBatch::new();
        batch.insert(handoff.clone()).update(lead.clone(), expected);
        let draft = AuditDraft::new(AuditEntityType::Lead, lead_id, AuditAction::Handoff)
            .changes(AuditChanges::new(
                Some(json!({ "handoffState": before })),
                Some(json!({ "handoffState": lead.handoff_state })),
            ))
            .meta("name", lead.name.clone())
            .meta("transition", "requested")
            .meta("handoffId", handoff.id().to_string())
            .meta("reason", handoff.reason.clone());
        let audit = self
            .recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);

        Ok(StagedRequest {
            batch,
            handoff,
            lead,
            audit,
        })
    }

    /// Take the lead over. The acting member becomes the lead owner.
    pub async fn accept_handoff(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        handoff_id: Uuid,
        notes: Option<String>,
    ) -> Result<Committed<Handoff>> {
        self.resolve(
            actor,
            organization_id,
            handoff_id,
            HandoffStatus::Accepted,
            notes,
        )
        .await
    }

    /// Decline the handoff. The lead projection records the rejection.
    pub async fn reject_handoff(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        handoff_id: Uuid,
        notes: Option<String>,
    ) -> Result<Committed<Handoff>> {
        self.resolve(
            actor,
            organization_id,
            handoff_id,
            HandoffStatus::Rejected,
            notes,
        )
        .await
    }

    /// Handoffs awaiting a decision, oldest first
    pub async fn pending_handoffs(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
    ) -> Result<Vec<Handoff>> {
        self.resolver
            .require_permission(actor, organization_id, Resource::Lead, Action::Read)?;
        self.store
            .handoffs_by_status(organization_id, HandoffStatus::Pending)
            .await
    }

    async fn resolve(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
        handoff_id: Uuid,
        outcome: HandoffStatus,
        notes: Option<String>,
    ) -> Result<Committed<Handoff>> {
        let actor = self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Lead,
            Action::Update,
        )?;

        let current = self
            .store
            .get_handoff(handoff_id)
            .await?
            .filter(|handoff| handoff.organization_id == organization_id)
            .filter(|handoff| handoff.status.can_transition_to(outcome))
            .ok_or_else(|| GatewayError::not_found(format!("pending handoff {}", handoff_id)))?;
        let mut lead = self.load_lead(organization_id, current.lead_id).await?;

        let now = Utc::now();
        let mut handoff = current.clone();
        handoff.status = outcome;
        handoff.resolved_by = Some(actor.member_id);
        handoff.resolved_at = Some(now);
        handoff.notes = notes;
        if outcome == HandoffStatus::Accepted {
            handoff.accepted_by = Some(actor.member_id);
            lead.assigned_to = Some(actor.member_id);
        }
        let handoff_expected = handoff.metadata.advance(now);

        let before = lead.handoff_state.clone();
        patch_projection(&mut lead, &handoff, actor.member_id, now);
        let lead_expected = lead.metadata.advance(now);

        let transition = match outcome {
            HandoffStatus::Accepted => "accepted",
            _ => "rejected",
        };

        let mut batch = WriteBatch::new();
        batch
            .update(handoff.clone(), handoff_expected)
            .update(lead.clone(), lead_expected);
        let draft = AuditDraft::new(AuditEntityType::Lead, lead.id(), AuditAction::Handoff)
            .changes(AuditChanges::new(
                Some(json!({ "handoffStatus": current.status, "handoffState": before })),
                Some(json!({ "handoffStatus": handoff.status, "handoffState": lead.handoff_state })),
            ))
            .meta("name", lead.name.clone())
            .meta("transition", transition)
            .meta("handoffId", handoff_id.to_string());
        let audit = self
            .recorder
            .stage(&mut batch, Some(actor), organization_id, draft, now);
        self.store.commit(batch).await?;

        let event = match outcome {
            HandoffStatus::Accepted => events::LEAD_HANDOFF_ACCEPTED,
            _ => events::LEAD_HANDOFF_REJECTED,
        };
        let dispatch =
            self.dispatcher
                .trigger(organization_id, event, events::handoff(&handoff, &lead));

        info!(
            organization_id = %organization_id,
            handoff_id = %handoff_id,
            status = %handoff.status,
            resolved_by = %actor.member_id,
            "Handoff resolved"
        );
        Ok(Committed {
            value: handoff,
            audit,
            dispatch: Some(dispatch),
        })
    }

    async fn load_lead(&self, organization_id: Uuid, lead_id: Uuid) -> Result<Lead> {
        self.store
            .get_lead(lead_id)
            .await?
            .filter(|lead| lead.organization_id == organization_id)
            .ok_or_else(|| GatewayError::not_found(format!("lead {}", lead_id)))
    }

    async fn check_recipient(&self, organization_id: Uuid, member_id: Uuid) -> Result<()> {
        let member = self
            .store
            .get_member(member_id)
            .await?
            .filter(|member| member.organization_id == organization_id)
            .ok_or_else(|| GatewayError::not_found(format!("team member {}", member_id)))?;

        if !member.is_active() {
            return Err(GatewayError::validation(format!(
                "team member {} is not available for handoffs",
                member_id
            )));
        }
        Ok(())
    }
}

/// Mirror a resolved handoff onto the lead, if the projection still tracks it
fn patch_projection(lead: &mut Lead, handoff: &Handoff, resolver: Uuid, now: DateTime<Utc>) {
    let Some(state) = lead
        .handoff_state
        .as_mut()
        .filter(|state| state.handoff_id == handoff.id())
    else {
        debug!(
            lead_id = %lead.metadata.id,
            handoff_id = %handoff.id(),
            "Lead projection tracks another handoff; leaving it untouched"
        );
        return;
    };

    state.completed_at = Some(now);
    state.notes = handoff.notes.clone();
    match handoff.status {
        HandoffStatus::Accepted => {
            state.status = HandoffProjectionStatus::Completed;
            state.to_member_id = Some(resolver);
        }
        HandoffStatus::Rejected => {
            state.status = HandoffProjectionStatus::Rejected;
            state.resolved_by = Some(resolver);
        }
        HandoffStatus::Pending => {}
    }
}
