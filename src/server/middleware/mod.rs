//! HTTP middleware implementations
//!
//! - Bearer authentication resolving the acting member

mod auth;
mod helpers;


pub use auth::{Actor, AuthMiddleware, AuthMiddlewareService};
pub use helpers::{extract_bearer_token, is_public_route};
