//! Webhook integration system
//!
//! Registered endpoints receive signed event notifications after a mutation
//! commits. Delivery runs on its own task and never feeds back into the
//! triggering operation.

mod dispatcher;
pub mod events;
mod manager;
pub mod signature;
#[cfg(test)]
mod tests;
mod types;

pub use dispatcher::WebhookDispatcher;
pub use manager::WebhookOperations;
pub use signature::{EVENT_HEADER, SIGNATURE_HEADER, sign_payload, verify_signature};
pub use types::{
    CreateWebhookRequest, CreatedWebhook, DispatchHandle, DispatchReport, UpdateWebhookRequest,
    WebhookEnvelope,
};
