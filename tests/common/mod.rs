//! Common test utilities for crm-gateway
//!
//! # Usage
//!
//! ```rust,ignore
//! use crate::common::TestOrganization;
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let org = TestOrganization::new().await;
//!     let agent = org.add_member("Hana", MemberRole::Agent).await;
//!     // ...
//! }
//! ```

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use fixtures::{TestOrganization, ctx, test_config};
