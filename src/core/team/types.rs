//! Team operation inputs

use crate::auth::rbac::PermissionOverrides;
use crate::core::models::{MemberRole, MemberType};
use serde::Deserialize;

/// Member creation input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMember {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: MemberRole,
    /// Must agree with the role when given
    #[serde(default, rename = "type")]
    pub member_type: Option<MemberType>,
    #[serde(default)]
    pub permissions: Option<PermissionOverrides>,
}

impl NewMember {
    pub fn new(name: impl Into<String>, role: MemberRole) -> Self {
        Self {
            name: name.into(),
            email: None,
            role,
            member_type: None,
            permissions: None,
        }
    }
}

/// Partial member update. `permissions: Some(empty)` clears the overrides.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UpdateMember {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<MemberRole>,
    pub permissions: Option<PermissionOverrides>,
}
