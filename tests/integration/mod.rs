//! Integration tests
//!
//! End-to-end scenarios driven through `CrmCore` and the HTTP surface.

pub mod audit_tests;
pub mod config_tests;
pub mod handoff_tests;
pub mod http_tests;
pub mod team_tests;
pub mod webhook_tests;
