//! Storage types

use crate::core::models::{
    AuditEntityType, AuditLogEntry, Handoff, Lead, Organization, TeamMember, Webhook,
};
use uuid::Uuid;

/// Document families held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Organization,
    Member,
    Lead,
    Handoff,
    Webhook,
    Audit,
}

impl DocumentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DocumentKind::Organization => "organization",
            DocumentKind::Member => "team member",
            DocumentKind::Lead => "lead",
            DocumentKind::Handoff => "handoff",
            DocumentKind::Webhook => "webhook",
            DocumentKind::Audit => "audit entry",
        }
    }
}

/// Addresses one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocKey {
    pub kind: DocumentKind,
    pub id: Uuid,
}

impl DocKey {
    pub fn new(kind: DocumentKind, id: Uuid) -> Self {
        Self { kind, id }
    }

    pub fn member(id: Uuid) -> Self {
        Self::new(DocumentKind::Member, id)
    }

    pub fn lead(id: Uuid) -> Self {
        Self::new(DocumentKind::Lead, id)
    }

    pub fn handoff(id: Uuid) -> Self {
        Self::new(DocumentKind::Handoff, id)
    }

    pub fn webhook(id: Uuid) -> Self {
        Self::new(DocumentKind::Webhook, id)
    }
}

impl std::fmt::Display for DocKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind.as_str(), self.id)
    }
}

/// Any storable document
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Organization(Organization),
    Member(TeamMember),
    Lead(Lead),
    Handoff(Handoff),
    Webhook(Webhook),
    Audit(AuditLogEntry),
}

impl Document {
    pub fn key(&self) -> DocKey {
        match self {
            Document::Organization(doc) => DocKey::new(DocumentKind::Organization, doc.metadata.id),
            Document::Member(doc) => DocKey::member(doc.metadata.id),
            Document::Lead(doc) => DocKey::lead(doc.metadata.id),
            Document::Handoff(doc) => DocKey::handoff(doc.metadata.id),
            Document::Webhook(doc) => DocKey::webhook(doc.metadata.id),
            Document::Audit(doc) => DocKey::new(DocumentKind::Audit, doc.id),
        }
    }

    /// Owning organization
    pub fn organization_id(&self) -> Uuid {
        match self {
            Document::Organization(doc) => doc.metadata.id,
            Document::Member(doc) => doc.organization_id,
            Document::Lead(doc) => doc.organization_id,
            Document::Handoff(doc) => doc.organization_id,
            Document::Webhook(doc) => doc.organization_id,
            Document::Audit(doc) => doc.organization_id,
        }
    }

    /// Stored revision; audit entries are never revised
    pub fn version(&self) -> i64 {
        match self {
            Document::Organization(doc) => doc.metadata.version,
            Document::Member(doc) => doc.metadata.version,
            Document::Lead(doc) => doc.metadata.version,
            Document::Handoff(doc) => doc.metadata.version,
            Document::Webhook(doc) => doc.metadata.version,
            Document::Audit(_) => 1,
        }
    }
}

macro_rules! impl_from_document {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Document {
                fn from(doc: $ty) -> Self {
                    Document::$variant(doc)
                }
            }
        )*
    };
}

impl_from_document! {
    Organization => Organization,
    Member => TeamMember,
    Lead => Lead,
    Handoff => Handoff,
    Webhook => Webhook,
    Audit => AuditLogEntry,
}

/// One staged write or read-set assertion
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Create a document; fails if the key exists
    Insert(Document),
    /// Replace a document still stored at `expected_version`
    Update { doc: Document, expected_version: i64 },
    /// Remove a document still stored at `expected_version`
    Delete { key: DocKey, expected_version: i64 },
    /// Assert a document is still stored at `version` without writing it
    Expect { key: DocKey, version: i64 },
}

/// Atomic multi-document unit of work
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, doc: impl Into<Document>) -> &mut Self {
        self.ops.push(WriteOp::Insert(doc.into()));
        self
    }

    /// Stage a replacement. `expected_version` is the version read before the change.
    pub fn update(&mut self, doc: impl Into<Document>, expected_version: i64) -> &mut Self {
        self.ops.push(WriteOp::Update {
            doc: doc.into(),
            expected_version,
        });
        self
    }

    pub fn delete(&mut self, key: DocKey, expected_version: i64) -> &mut Self {
        self.ops.push(WriteOp::Delete {
            key,
            expected_version,
        });
        self
    }

    pub fn expect(&mut self, key: DocKey, version: i64) -> &mut Self {
        self.ops.push(WriteOp::Expect { key, version });
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// Audit history query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuditFilter {
    /// Restrict to one entity kind
    pub entity_type: Option<AuditEntityType>,
    /// Restrict to one entity
    pub entity_id: Option<Uuid>,
    /// Maximum number of entries
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn for_entity(entity_type: AuditEntityType, entity_id: Uuid) -> Self {
        Self {
            entity_type: Some(entity_type),
            entity_id: Some(entity_id),
            limit: None,
        }
    }

    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        self.entity_type.is_none_or(|t| t == entry.entity_type)
            && self.entity_id.is_none_or(|id| id == entry.entity_id)
    }
}
