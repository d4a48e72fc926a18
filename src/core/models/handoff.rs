//! Handoff models

use super::Metadata;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Request to transfer a lead from an AI agent to a human (or another member)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Handoff {
    /// Handoff metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Owning organization
    pub organization_id: Uuid,
    /// Lead being handed off
    pub lead_id: Uuid,
    /// Requesting member
    pub from_member_id: Uuid,
    /// Preferred receiving member
    pub to_member_id: Option<Uuid>,
    /// Why the handoff was requested
    pub reason: String,
    /// Conversation summary
    pub summary: Option<String>,
    /// Suggested next steps
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    /// Lifecycle status
    pub status: HandoffStatus,
    /// Member who accepted
    pub accepted_by: Option<Uuid>,
    /// Member who accepted or rejected
    pub resolved_by: Option<Uuid>,
    /// Resolution timestamp
    pub resolved_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Resolver notes
    pub notes: Option<String>,
}

impl Handoff {
    /// Handoff id
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    /// Whether the handoff still awaits a decision
    pub fn is_pending(&self) -> bool {
        self.status == HandoffStatus::Pending
    }
}

/// Handoff lifecycle: `pending → accepted` or `pending → rejected`, both terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffStatus {
    Pending,
    Accepted,
    Rejected,
}

impl HandoffStatus {
    /// Whether `self → next` is a legal transition
    pub fn can_transition_to(self, next: HandoffStatus) -> bool {
        matches!(
            (self, next),
            (HandoffStatus::Pending, HandoffStatus::Accepted)
                | (HandoffStatus::Pending, HandoffStatus::Rejected)
        )
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, HandoffStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HandoffStatus::Pending => "pending",
            HandoffStatus::Accepted => "accepted",
            HandoffStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for HandoffStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
