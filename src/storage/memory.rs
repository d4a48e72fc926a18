//! In-memory document store
//!
//! Tables are guarded by a single `RwLock`; `commit` validates every staged
//! operation under the write lock before applying any of them.

use super::DocumentStore;
use super::types::{AuditFilter, DocKey, Document, DocumentKind, WriteBatch, WriteOp};
use crate::core::models::{
    AuditLogEntry, Handoff, HandoffStatus, Lead, MemberStatus, Organization, TeamMember, Webhook,
};
use crate::utils::error::{GatewayError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Tables {
    organizations: HashMap<Uuid, Organization>,
    members: HashMap<Uuid, TeamMember>,
    leads: HashMap<Uuid, Lead>,
    handoffs: HashMap<Uuid, Handoff>,
    webhooks: HashMap<Uuid, Webhook>,
    audit: HashMap<Uuid, AuditLogEntry>,
    /// (kind, organization) -> ids in insertion order
    by_organization: HashMap<(DocumentKind, Uuid), Vec<Uuid>>,
}

impl Tables {
    fn version_of(&self, key: &DocKey) -> Option<i64> {
        match key.kind {
            DocumentKind::Organization => self.organizations.get(&key.id).map(|d| d.metadata.version),
            DocumentKind::Member => self.members.get(&key.id).map(|d| d.metadata.version),
            DocumentKind::Lead => self.leads.get(&key.id).map(|d| d.metadata.version),
            DocumentKind::Handoff => self.handoffs.get(&key.id).map(|d| d.metadata.version),
            DocumentKind::Webhook => self.webhooks.get(&key.id).map(|d| d.metadata.version),
            DocumentKind::Audit => self.audit.get(&key.id).map(|_| 1),
        }
    }

    fn check_version(&self, key: &DocKey, expected: i64) -> Result<()> {
        match self.version_of(key) {
            Some(stored) if stored == expected => Ok(()),
            Some(stored) => Err(GatewayError::conflict(format!(
                "{} changed concurrently (expected version {}, found {})",
                key, expected, stored
            ))),
            None => Err(GatewayError::conflict(format!("{} no longer exists", key))),
        }
    }

    fn validate(&self, ops: &[WriteOp]) -> Result<()> {
        let mut staged_inserts = HashSet::new();

        for op in ops {
            match op {
                WriteOp::Insert(doc) => {
                    let key = doc.key();
                    if self.version_of(&key).is_some() || !staged_inserts.insert(key) {
                        return Err(GatewayError::conflict(format!("{} already exists", key)));
                    }
                }
                WriteOp::Update {
                    doc,
                    expected_version,
                } => {
                    let key = doc.key();
                    if key.kind == DocumentKind::Audit {
                        return Err(GatewayError::storage("audit entries are write-once"));
                    }
                    self.check_version(&key, *expected_version)?;
                }
                WriteOp::Delete {
                    key,
                    expected_version,
                } => {
                    if key.kind != DocumentKind::Webhook {
                        return Err(GatewayError::storage(format!(
                            "{} documents cannot be deleted",
                            key.kind.as_str()
                        )));
                    }
                    self.check_version(key, *expected_version)?;
                }
                WriteOp::Expect { key, version } => self.check_version(key, *version)?,
            }
        }

        Ok(())
    }

    fn apply(&mut self, op: WriteOp) {
        match op {
            WriteOp::Insert(doc) => {
                let key = doc.key();
                self.by_organization
                    .entry((key.kind, doc.organization_id()))
                    .or_default()
                    .push(key.id);
                self.put(doc);
            }
            WriteOp::Update {
                mut doc,
                expected_version,
            } => {
                set_version(&mut doc, expected_version + 1);
                if let Document::Webhook(webhook) = &mut doc {
                    // Delivery bookkeeping is only written by record_webhook_attempt
                    if let Some(stored) = self.webhooks.get(&webhook.metadata.id) {
                        webhook.last_triggered = stored.last_triggered;
                        webhook.last_delivered_at = stored.last_delivered_at;
                    }
                }
                self.put(doc);
            }
            WriteOp::Delete { key, .. } => {
                if let Some(webhook) = self.webhooks.remove(&key.id) {
                    if let Some(ids) = self
                        .by_organization
                        .get_mut(&(key.kind, webhook.organization_id))
                    {
                        ids.retain(|id| *id != key.id);
                    }
                }
            }
            WriteOp::Expect { .. } => {}
        }
    }

    fn put(&mut self, doc: Document) {
        match doc {
            Document::Organization(d) => {
                self.organizations.insert(d.metadata.id, d);
            }
            Document::Member(d) => {
                self.members.insert(d.metadata.id, d);
            }
            Document::Lead(d) => {
                self.leads.insert(d.metadata.id, d);
            }
            Document::Handoff(d) => {
                self.handoffs.insert(d.metadata.id, d);
            }
            Document::Webhook(d) => {
                self.webhooks.insert(d.metadata.id, d);
            }
            Document::Audit(d) => {
                self.audit.insert(d.id, d);
            }
        }
    }

    fn indexed<'a, T>(
        &'a self,
        kind: DocumentKind,
        organization_id: Uuid,
        table: &'a HashMap<Uuid, T>,
    ) -> impl DoubleEndedIterator<Item = &'a T> + 'a {
        self.by_organization
            .get(&(kind, organization_id))
            .into_iter()
            .flatten()
            .filter_map(move |id| table.get(id))
    }
}

fn set_version(doc: &mut Document, version: i64) {
    match doc {
        Document::Organization(d) => d.metadata.version = version,
        Document::Member(d) => d.metadata.version = version,
        Document::Lead(d) => d.metadata.version = version,
        Document::Handoff(d) => d.metadata.version = version,
        Document::Webhook(d) => d.metadata.version = version,
        Document::Audit(_) => {}
    }
}

/// Process-local [`DocumentStore`] with per-organization secondary indexes
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    commits: AtomicU64,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successfully applied batches
    pub fn commit_count(&self) -> u64 {
        self.commits.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn get_organization(&self, id: Uuid) -> Result<Option<Organization>> {
        Ok(self.tables.read().organizations.get(&id).cloned())
    }

    async fn get_member(&self, id: Uuid) -> Result<Option<TeamMember>> {
        Ok(self.tables.read().members.get(&id).cloned())
    }

    async fn get_lead(&self, id: Uuid) -> Result<Option<Lead>> {
        Ok(self.tables.read().leads.get(&id).cloned())
    }

    async fn get_handoff(&self, id: Uuid) -> Result<Option<Handoff>> {
        Ok(self.tables.read().handoffs.get(&id).cloned())
    }

    async fn get_webhook(&self, id: Uuid) -> Result<Option<Webhook>> {
        Ok(self.tables.read().webhooks.get(&id).cloned())
    }

    async fn members_by_organization(&self, organization_id: Uuid) -> Result<Vec<TeamMember>> {
        let tables = self.tables.read();
        Ok(tables
            .indexed(DocumentKind::Member, organization_id, &tables.members)
            .cloned()
            .collect())
    }

    async fn members_by_status(
        &self,
        organization_id: Uuid,
        status: MemberStatus,
    ) -> Result<Vec<TeamMember>> {
        let tables = self.tables.read();
        Ok(tables
            .indexed(DocumentKind::Member, organization_id, &tables.members)
            .filter(|member| member.status == status)
            .cloned()
            .collect())
    }

    async fn handoffs_by_status(
        &self,
        organization_id: Uuid,
        status: HandoffStatus,
    ) -> Result<Vec<Handoff>> {
        let tables = self.tables.read();
        Ok(tables
            .indexed(DocumentKind::Handoff, organization_id, &tables.handoffs)
            .filter(|handoff| handoff.status == status)
            .cloned()
            .collect())
    }

    async fn webhooks_by_organization(&self, organization_id: Uuid) -> Result<Vec<Webhook>> {
        let tables = self.tables.read();
        Ok(tables
            .indexed(DocumentKind::Webhook, organization_id, &tables.webhooks)
            .cloned()
            .collect())
    }

    async fn audit_entries(
        &self,
        organization_id: Uuid,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditLogEntry>> {
        let tables = self.tables.read();
        Ok(tables
            .indexed(DocumentKind::Audit, organization_id, &tables.audit)
            .rev()
            .filter(|entry| filter.matches(entry))
            .take(filter.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut tables = self.tables.write();
        if let Err(e) = tables.validate(batch.ops()) {
            warn!("Rejected write batch: {}", e);
            return Err(e);
        }

        let op_count = batch.len();
        for op in batch.into_ops() {
            tables.apply(op);
        }
        self.commits.fetch_add(1, Ordering::Relaxed);

        debug!(ops = op_count, "Committed write batch");
        Ok(())
    }

    async fn record_webhook_attempt(
        &self,
        webhook_id: Uuid,
        at: DateTime<Utc>,
        delivered: bool,
    ) -> Result<()> {
        let mut tables = self.tables.write();
        let webhook = tables
            .webhooks
            .get_mut(&webhook_id)
            .ok_or_else(|| GatewayError::not_found(format!("webhook {}", webhook_id)))?;

        webhook.last_triggered = Some(at);
        if delivered {
            webhook.last_delivered_at = Some(at);
        }
        Ok(())
    }
}
