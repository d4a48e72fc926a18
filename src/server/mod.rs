//! HTTP server implementation
//!
//! Routes under `/v1/organizations/{org_id}` expose the mutation core. The
//! acting member is resolved from a bearer token by [`middleware::AuthMiddleware`].

pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{HttpServer, configure_app};
pub use state::AppState;
