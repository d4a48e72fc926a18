//! Payload signing and verification

use crate::utils::error::{GatewayError, Result};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying `sha256=<hex>`
pub const SIGNATURE_HEADER: &str = "X-Webhook-Signature";
/// Header carrying the event name
pub const EVENT_HEADER: &str = "X-Webhook-Event";

const SIGNATURE_PREFIX: &str = "sha256=";

/// Lowercase hex HMAC-SHA256 of the exact body bytes
pub fn sign_payload(secret: &str, body: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| GatewayError::Crypto(format!("Invalid HMAC key: {}", e)))?;

    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Value of the signature header for a body
pub fn signature_header(secret: &str, body: &[u8]) -> Result<String> {
    Ok(format!("{}{}", SIGNATURE_PREFIX, sign_payload(secret, body)?))
}

/// Receiver-side check of a signature header against the received body
pub fn verify_signature(secret: &str, body: &[u8], header: &str) -> bool {
    let Some(received) = header.strip_prefix(SIGNATURE_PREFIX) else {
        return false;
    };

    match sign_payload(secret, body) {
        Ok(expected) => constant_time_eq(&expected, received),
        Err(_) => false,
    }
}

/// Constant-time string comparison
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}
