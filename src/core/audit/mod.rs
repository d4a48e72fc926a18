//! Audit trail
//!
//! Entries are staged into the same write batch as the change they describe
//! and are never updated or deleted afterwards.

mod describe;
mod recorder;


pub use describe::describe;
pub use recorder::{AuditDraft, AuditRecorder};
