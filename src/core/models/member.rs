//! Team member models

use super::Metadata;
use crate::auth::rbac::PermissionOverrides;
use crate::utils::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A human or AI participant of an organization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Member metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Owning organization
    pub organization_id: Uuid,
    /// Display name
    pub name: String,
    /// Contact email (humans only)
    pub email: Option<String>,
    /// Member role
    pub role: MemberRole,
    /// Member type
    #[serde(rename = "type")]
    pub member_type: MemberType,
    /// Member status
    pub status: MemberStatus,
    /// Per-member permission overrides
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionOverrides>,
    /// Member who created or invited this one
    pub invited_by: Option<Uuid>,
}

impl TeamMember {
    /// Create a new active team member
    pub fn new(
        organization_id: Uuid,
        name: impl Into<String>,
        role: MemberRole,
        invited_by: Option<Uuid>,
    ) -> Self {
        Self {
            metadata: Metadata::new(),
            organization_id,
            name: name.into(),
            email: None,
            role,
            member_type: role.implied_type(),
            status: MemberStatus::Active,
            permissions: None,
            invited_by,
        }
    }

    /// Member id
    pub fn id(&self) -> Uuid {
        self.metadata.id
    }

    /// Check if member is active
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }

    /// Check if member counts towards the active-admin invariant
    pub fn is_active_admin(&self) -> bool {
        self.role == MemberRole::Admin && self.is_active()
    }
}

/// Member role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Organization administrator
    Admin,
    /// Team manager
    Manager,
    /// Human sales agent
    Agent,
    /// AI agent
    Ai,
}

impl MemberRole {
    /// All roles, highest rank first
    pub const ALL: [MemberRole; 4] = [
        MemberRole::Admin,
        MemberRole::Manager,
        MemberRole::Agent,
        MemberRole::Ai,
    ];

    /// Delegation rank: admin(3) > manager(2) > agent(1) > ai(0)
    pub fn rank(self) -> u8 {
        match self {
            MemberRole::Admin => 3,
            MemberRole::Manager => 2,
            MemberRole::Agent => 1,
            MemberRole::Ai => 0,
        }
    }

    /// Whether an actor holding `self` may grant `other`
    pub fn can_grant(self, other: MemberRole) -> bool {
        other.rank() <= self.rank()
    }

    /// Member type this role requires
    pub fn implied_type(self) -> MemberType {
        match self {
            MemberRole::Ai => MemberType::Ai,
            _ => MemberType::Human,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MemberRole::Admin => "admin",
            MemberRole::Manager => "manager",
            MemberRole::Agent => "agent",
            MemberRole::Ai => "ai",
        }
    }
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberRole {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(MemberRole::Admin),
            "manager" => Ok(MemberRole::Manager),
            "agent" => Ok(MemberRole::Agent),
            "ai" => Ok(MemberRole::Ai),
            other => Err(GatewayError::validation(format!("unknown role '{}'", other))),
        }
    }
}

/// Member type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberType {
    Human,
    Ai,
}

impl MemberType {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberType::Human => "human",
            MemberType::Ai => "ai",
        }
    }
}

/// Member status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Available
    Active,
    /// Deactivated (removed from the team)
    Inactive,
    /// Active but currently unavailable for assignments
    Busy,
}

impl MemberStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MemberStatus::Active => "active",
            MemberStatus::Inactive => "inactive",
            MemberStatus::Busy => "busy",
        }
    }
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
