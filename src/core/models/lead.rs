//! Lead models
//!
//! Only the fields the mutation core touches are modelled; the rest of the
//! lead lives in `custom_fields`.

use super::{AttributeMap, Metadata};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sales lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    /// Lead metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Owning organization
    pub organization_id: Uuid,
    /// Lead display name
    pub name: String,
    /// Member currently owning the lead
    pub assigned_to: Option<Uuid>,
    /// Projection of the latest handoff targeting this lead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handoff_state: Option<HandoffState>,
    /// Free-form custom fields
    #[serde(default)]
    pub custom_fields: AttributeMap,
}

impl Lead {
    /// Create a new lead
    pub fn new(organization_id: Uuid, name: impl Into<String>) -> Self {
        Self {
            metadata: Metadata::new(),
            organization_id,
            name: name.into(),
            assigned_to: None,
            handoff_state: None,
            custom_fields: AttributeMap::new(),
        }
    }

    /// Lead id
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    /// Whether a handoff is currently in flight for this lead
    pub fn has_active_handoff(&self) -> bool {
        self.handoff_state
            .as_ref()
            .is_some_and(|state| state.status.is_active())
    }
}

/// Denormalized handoff projection stored on the lead
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoffState {
    /// Projection status
    pub status: HandoffProjectionStatus,
    /// Handoff this projection mirrors
    pub handoff_id: Uuid,
    /// Requesting member
    pub from_member_id: Uuid,
    /// Member who took the lead over (set on completion)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_member_id: Option<Uuid>,
    /// Why the handoff was requested
    pub reason: String,
    /// Conversation summary for the receiving human
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Suggested next steps
    #[serde(default)]
    pub suggested_actions: Vec<String>,
    /// When the handoff was requested
    pub requested_at: chrono::DateTime<chrono::Utc>,
    /// When the handoff was resolved (accepted or rejected)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    /// Member who rejected the handoff
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<Uuid>,
    /// Resolver notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Projection vocabulary; deliberately distinct from `HandoffStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffProjectionStatus {
    Requested,
    Pending,
    Completed,
    Rejected,
}

impl HandoffProjectionStatus {
    /// Requested and pending projections block a new request
    pub fn is_active(self) -> bool {
        matches!(self, Self::Requested | Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}
