//! Storage layer for the CRM gateway
//!
//! The mutation core only talks to storage through [`DocumentStore`]. Every
//! mutating operation stages its writes into one [`WriteBatch`] and commits it
//! atomically; read-set assertions inside the batch make the guard checks
//! serializable against concurrent writers.

/// In-memory document store
pub mod memory;
/// Documents, keys and write batches
pub mod types;


pub use memory::InMemoryStore;
pub use types::{AuditFilter, DocKey, Document, DocumentKind, WriteBatch, WriteOp};

use crate::core::models::{
    AuditLogEntry, Handoff, HandoffStatus, Lead, MemberStatus, Organization, TeamMember, Webhook,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Storage collaborator consumed by the mutation core
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Get an organization by id
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>>;

    /// Get a team member by id
    async fn get_member(&self, id: Uuid) -> Result<Option<TeamMember>>;

    /// Get a lead by id
    async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>>;

    /// Get a handoff by id
    async fn get_handoff(&self, id: Uuid) -> Result<Option<Handoff>>;

    /// Get a webhook by id
    async fn get_webhook(&self, id: Uuid) -> Result<Option<Webhook>>;

    /// All members of an organization, oldest first
    async fn members_by_organization(&self, organization_id: Uuid) -> Result<Vec<TeamMember>>;

    /// Members of an organization with the given status, oldest first
    async fn members_by_status(
        &self,
        organization_id: Uuid,
        status: MemberStatus,
    ) -> Result<Vec<TeamMember>>;

    /// Handoffs of an organization with the given status, oldest first
    async fn handoffs_by_status(
        &self,
        organization_id: Uuid,
        status: HandoffStatus,
    ) -> Result<Vec<Handoff>>;

    /// Webhooks registered by an organization
    async fn webhooks_by_organization(&self, organization_id: Uuid) -> Result<Vec<Webhook>>;

    /// Audit entries of an organization, newest first
    async fn audit_entries(
        &self,
        organization_id: Uuid,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditLogEntry>>;

    /// Apply every operation of the batch or none of them
    async fn commit(&self, batch: WriteBatch) -> Result<()>;

    /// Record a webhook delivery attempt outside any batch
    async fn record_webhook_attempt(
        &self,
        webhook_id: Uuid,
        at: DateTime<Utc>,
        delivered: bool,
    ) -> Result<()>;
}
