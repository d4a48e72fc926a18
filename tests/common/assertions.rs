//! Custom test assertions
//!
//! Domain-specific assertions for crm-gateway.

use crm_gateway::core::webhooks::{SIGNATURE_HEADER, verify_signature};
use crm_gateway::{AuditLogEntry, GatewayError};
use wiremock::Request;

/// Assertions for audit histories
pub trait AuditAssertions {
    /// Assert the most recent entry carries this description
    fn assert_latest_description(&self, expected: &str);
}

impl AuditAssertions for [AuditLogEntry] {
    fn assert_latest_description(&self, expected: &str) {
        let latest = self.first().expect("Expected at least one audit entry");
        assert_eq!(latest.description, expected);
    }
}

/// Assert a delivery received by a mock server validates against `secret`
pub fn assert_signed_by(request: &Request, secret: &str) {
    let header = request
        .headers
        .get(SIGNATURE_HEADER)
        .expect("Expected a signature header")
        .to_str()
        .expect("Signature header is not ASCII");
    assert!(
        verify_signature(secret, &request.body, header),
        "Signature {} does not match the delivered body",
        header
    );
}

/// Assert an error is a guard or authorization rejection
pub fn assert_guard_rejection(err: &GatewayError) {
    assert!(
        err.is_guard_rejection(),
        "Expected a guard rejection, got {:?}",
        err
    );
}
