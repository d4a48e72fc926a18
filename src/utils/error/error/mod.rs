//! Error handling for the CRM gateway
//!
//! This module defines all error types used throughout the mutation core.

#![allow(missing_docs)]

mod helpers;
mod response;
#[cfg(test)]
mod tests;
mod types;

// Re-export all public types
pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
