//! Organization bootstrap

use crate::auth::context::ActorContext;
use crate::auth::rbac::{Action, AuthorizationResolver, Resource};
use crate::core::audit::{AuditDraft, AuditRecorder};
use crate::core::models::{
    AuditAction, AuditChanges, AuditEntityType, MemberRole, Metadata, Organization, Severity,
    TeamMember,
};
use crate::core::outcome::Committed;
use crate::core::team::validate_email;
use crate::storage::{DocumentStore, WriteBatch};
use crate::utils::error::{GatewayError, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Organization creation input
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrganization {
    pub name: String,
    pub admin_name: String,
    #[serde(default)]
    pub admin_email: Option<String>,
}

/// A freshly created organization and its founding admin
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationBootstrap {
    pub organization: Organization,
    pub admin: TeamMember,
}

#[derive(Clone)]
pub struct OrganizationService {
    store: Arc<dyn DocumentStore>,
    resolver: Arc<AuthorizationResolver>,
    recorder: AuditRecorder,
}

impl OrganizationService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        resolver: Arc<AuthorizationResolver>,
        recorder: AuditRecorder,
    ) -> Self {
        Self {
            store,
            resolver,
            recorder,
        }
    }

    /// Create an organization together with its first active admin.
    ///
    /// Runs as a system action; the organization never exists without an
    /// admin.
    pub async fn create_organization(
        &self,
        input: NewOrganization,
    ) -> Result<Committed<OrganizationBootstrap>> {
        let name = input.name.trim();
        let admin_name = input.admin_name.trim();
        if name.is_empty() || admin_name.is_empty() {
            return Err(GatewayError::validation(
                "organization and admin names cannot be empty",
            ));
        }

        let now = chrono::Utc::now();
        let mut organization = Organization::new(name);
        organization.metadata = Metadata::at(now);
        if organization.slug.is_empty() {
            return Err(GatewayError::validation(
                "organization name must contain letters or digits",
            ));
        }

        let admin_email = input.admin_email.as_deref().map(validate_email).transpose()?;

        let mut admin = TeamMember::new(organization.id(), admin_name, MemberRole::Admin, None);
        admin.metadata = Metadata::at(now);
        admin.email = admin_email;

        let mut batch = WriteBatch::new();
        batch.insert(organization.clone()).insert(admin.clone());
        let draft = AuditDraft::new(
            AuditEntityType::Organization,
            organization.id(),
            AuditAction::Create,
        )
        .changes(AuditChanges::created(json!({
            "name": organization.name,
            "slug": organization.slug,
            "adminId": admin.id(),
        })))
        .meta("name", organization.name.clone())
        .severity(Severity::High);
        let audit = self
            .recorder
            .stage(&mut batch, None, organization.id(), draft, now);
        self.store.commit(batch).await?;

        info!(
            organization_id = %organization.id(),
            admin_id = %admin.id(),
            "Organization created"
        );
        Ok(Committed {
            value: OrganizationBootstrap {
                organization,
                admin,
            },
            audit,
            dispatch: None,
        })
    }

    /// Read an organization the actor belongs to
    pub async fn get_organization(
        &self,
        actor: Option<&ActorContext>,
        organization_id: Uuid,
    ) -> Result<Organization> {
        self.resolver.require_permission(
            actor,
            organization_id,
            Resource::Organization,
            Action::Read,
        )?;
        self.store
            .get_organization(organization_id)
            .await?
            .ok_or_else(|| GatewayError::not_found(format!("organization {}", organization_id)))
    }
}
