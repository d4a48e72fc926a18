//! Utility modules for the CRM gateway
//!
//! - **error**: crate-wide error type and its HTTP mapping
//! - **logging**: tracing subscriber initialisation

pub mod error;
pub mod logging;

pub use logging::init_tracing;
