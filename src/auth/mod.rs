//! Authentication and authorization system
//!
//! Every mutating operation resolves an explicit [`ActorContext`] first and
//! asks the [`AuthorizationResolver`] before touching storage.

pub mod context;
pub mod jwt;
pub mod rbac;

// Re-export commonly used types
pub use context::ActorContext;
pub use jwt::JwtHandler;
pub use rbac::{Action, AuthorizationResolver, EffectivePermissionSet, PermissionOverrides, Resource};
