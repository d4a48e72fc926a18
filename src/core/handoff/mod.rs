//! AI-to-human handoff lifecycle
//!
//! A [`Handoff`](crate::core::models::Handoff) record is the source of truth;
//! the lead carries a denormalized projection that is written in the same
//! batch as every handoff write.

mod coordinator;

pub use coordinator::{HandoffCoordinator, HandoffRequest};
