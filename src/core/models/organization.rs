//! Organization model

use super::Metadata;
use serde::{Deserialize, Serialize};

/// Tenant boundary owning every other document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization metadata
    #[serde(flatten)]
    pub metadata: Metadata,
    /// Display name
    pub name: String,
    /// URL-safe slug derived from the name
    pub slug: String,
    /// Whether the organization is active
    pub is_active: bool,
}

impl Organization {
    /// Create a new organization
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let slug = slugify(&name);
        Self {
            metadata: Metadata::new(),
            name,
            slug,
            is_active: true,
        }
    }

    /// Organization id
    pub fn id(&self) -> uuid::Uuid {
        self.metadata.id
    }
}

fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
