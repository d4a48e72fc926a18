//! Role-Based Access Control (RBAC) system
//!
//! This module resolves an actor's effective permission set from their role
//! plus optional per-member overrides and answers allow/deny queries.

mod helpers;
mod permissions;
mod roles;
mod system;
mod types;

// Re-export public types and structs
pub use system::AuthorizationResolver;
pub use types::{Action, EffectivePermissionSet, PermissionOverrides, Resource};
