//! Webhook event catalogue and payload builders

use crate::core::models::{Handoff, Lead, TeamMember};
use serde_json::{Value, json};

pub const TEAM_MEMBER_CREATED: &str = "teamMember.created";
pub const TEAM_MEMBER_UPDATED: &str = "teamMember.updated";
pub const TEAM_MEMBER_REMOVED: &str = "teamMember.removed";
pub const TEAM_MEMBER_REACTIVATED: &str = "teamMember.reactivated";
pub const LEAD_HANDOFF_REQUESTED: &str = "lead.handoff.requested";
pub const LEAD_HANDOFF_ACCEPTED: &str = "lead.handoff.accepted";
pub const LEAD_HANDOFF_REJECTED: &str = "lead.handoff.rejected";

/// Every event a webhook may subscribe to, besides `*`
pub const CATALOGUE: [&str; 7] = [
    TEAM_MEMBER_CREATED,
    TEAM_MEMBER_UPDATED,
    TEAM_MEMBER_REMOVED,
    TEAM_MEMBER_REACTIVATED,
    LEAD_HANDOFF_REQUESTED,
    LEAD_HANDOFF_ACCEPTED,
    LEAD_HANDOFF_REJECTED,
];

pub fn is_known(event: &str) -> bool {
    CATALOGUE.contains(&event)
}

/// Build a team member event
pub fn team_member(member: &TeamMember, changed: &[String]) -> Value {
    json!({
        "memberId": member.id(),
        "name": member.name,
        "role": member.role,
        "type": member.member_type,
        "status": member.status,
        "permissions": member.permissions,
        "changedFields": changed,
    })
}

/// Build a handoff event
pub fn handoff(handoff: &Handoff, lead: &Lead) -> Value {
    json!({
        "handoffId": handoff.id(),
        "leadId": lead.id(),
        "leadName": lead.name,
        "status": handoff.status,
        "fromMemberId": handoff.from_member_id,
        "toMemberId": handoff.to_member_id,
        "acceptedBy": handoff.accepted_by,
        "resolvedBy": handoff.resolved_by,
        "reason": handoff.reason,
        "notes": handoff.notes,
    })
}
