//! Human-readable audit descriptions

use crate::core::models::{AttributeMap, AuditAction, AuditChanges, AuditEntityType};
use serde_json::Value;

/// Render a stable sentence for an audit entry.
///
/// Pure: identical inputs always render identical output. The entity's display
/// name is taken from `metadata["name"]` when present.
pub fn describe(
    action: AuditAction,
    entity_type: AuditEntityType,
    changes: &AuditChanges,
    metadata: &AttributeMap,
) -> String {
    let subject = subject(entity_type, metadata);

    match action {
        AuditAction::Create => match field(changes.after.as_ref(), "role") {
            Some(role) => format!("Created {} with role {}", subject, role),
            None => format!("Created {}", subject),
        },
        AuditAction::Update => {
            let fields = changed_fields(changes);
            if fields.is_empty() {
                format!("Updated {}", subject)
            } else {
                format!("Updated {}: {}", subject, fields.join(", "))
            }
        }
        AuditAction::RoleChange => transition("role", &subject, changes),
        AuditAction::StatusChange => transition("status", &subject, changes),
        AuditAction::PermissionChange => format!("Changed permissions of {}", subject),
        AuditAction::Remove => format!("Removed {}", subject),
        AuditAction::Reactivate => format!("Reactivated {}", subject),
        AuditAction::Delete => format!("Deleted {}", subject),
        AuditAction::Handoff => {
            let sentence = match metadata.get("transition").and_then(Value::as_str) {
                Some("requested") => format!("Requested handoff of {}", subject),
                Some("accepted") => format!("Accepted handoff of {}", subject),
                Some("rejected") => format!("Rejected handoff of {}", subject),
                _ => format!("Updated handoff of {}", subject),
            };
            match metadata.get("reason").and_then(Value::as_str) {
                Some(reason) => format!("{} (reason: {})", sentence, reason),
                None => sentence,
            }
        }
    }
}

fn subject(entity_type: AuditEntityType, metadata: &AttributeMap) -> String {
    match metadata.get("name").and_then(Value::as_str) {
        Some(name) => format!("{} \"{}\"", entity_type.label(), name),
        None => entity_type.label().to_string(),
    }
}

fn transition(what: &str, subject: &str, changes: &AuditChanges) -> String {
    let before = field(changes.before.as_ref(), what);
    let after = field(changes.after.as_ref(), what);
    match (before, after) {
        (Some(before), Some(after)) => {
            format!("Changed {} of {} from {} to {}", what, subject, before, after)
        }
        (None, Some(after)) => format!("Changed {} of {} to {}", what, subject, after),
        _ => format!("Changed {} of {}", what, subject),
    }
}

fn field(snapshot: Option<&Value>, key: &str) -> Option<String> {
    snapshot?.get(key).map(render)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "none".to_string(),
        other => other.to_string(),
    }
}

/// Keys whose value differs between the snapshots, sorted
fn changed_fields(changes: &AuditChanges) -> Vec<String> {
    let empty = serde_json::Map::new();
    let before = changes
        .before
        .as_ref()
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let after = changes
        .after
        .as_ref()
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut keys: Vec<String> = before
        .keys()
        .chain(after.keys())
        .filter(|key| before.get(*key) != after.get(*key))
        .cloned()
        .collect();
    keys.sort();
    keys.dedup();
    keys
}
