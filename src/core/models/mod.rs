//! Core data models for the CRM gateway
//!
//! This module defines the documents the mutation core reads and writes. Every
//! document is owned by exactly one organization; cross-document references
//! (handoff → member, lead → member) are plain ids used for lookup only.

pub mod audit;
pub mod handoff;
pub mod lead;
pub mod member;
pub mod organization;
pub mod webhook;

// Re-export commonly used types
pub use audit::*;
pub use handoff::*;
pub use lead::*;
pub use member::*;
pub use organization::*;
pub use webhook::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Schema-less key → JSON value map (custom fields, audit metadata).
///
/// Ordered so that serialization and rendered descriptions are stable.
pub type AttributeMap = BTreeMap<String, serde_json::Value>;

/// Common metadata for all documents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Unique identifier
    pub id: Uuid,
    /// Creation timestamp
    pub created_at: chrono::DateTime<chrono::Utc>,
    /// Last update timestamp
    pub updated_at: chrono::DateTime<chrono::Utc>,
    /// Version for optimistic locking
    pub version: i64,
}

impl Default for Metadata {
    fn default() -> Self {
        let now = chrono::Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }
}

impl Metadata {
    /// Create new metadata
    pub fn new() -> Self {
        Self::default()
    }

    /// Create metadata pinned to a timestamp
    pub fn at(now: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Stamp the next revision and return the version the store must still hold
    pub fn advance(&mut self, now: chrono::DateTime<chrono::Utc>) -> i64 {
        let expected = self.version;
        self.updated_at = now;
        self.version += 1;
        expected
    }
}
