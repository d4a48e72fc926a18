//! Results of committed mutations

use crate::core::models::AuditLogEntry;
use crate::core::webhooks::DispatchHandle;

/// A change that was written
#[derive(Debug)]
pub struct Committed<T> {
    /// Document as committed
    pub value: T,
    /// Audit entry written in the same batch
    pub audit: AuditLogEntry,
    /// Fan-out scheduled after the commit, if the change emits an event
    pub dispatch: Option<DispatchHandle>,
}

/// Outcome of an idempotent mutation
#[derive(Debug)]
pub enum MutationOutcome<T> {
    /// The change was committed
    Applied(Committed<T>),
    /// Nothing to change; no write, no audit entry, no event
    Unchanged(T),
}

impl<T> MutationOutcome<T> {
    pub fn applied(value: T, audit: AuditLogEntry, dispatch: Option<DispatchHandle>) -> Self {
        Self::Applied(Committed {
            value,
            audit,
            dispatch,
        })
    }

    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Applied(committed) => &committed.value,
            Self::Unchanged(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Applied(committed) => committed.value,
            Self::Unchanged(value) => value,
        }
    }

    /// Take the scheduled fan-out, if any
    pub fn into_dispatch(self) -> Option<DispatchHandle> {
        match self {
            Self::Applied(committed) => committed.dispatch,
            Self::Unchanged(_) => None,
        }
    }
}
