//! Member email addresses

use crate::utils::error::{GatewayError, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Email pattern: local@domain.tld
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .inspect_err(|e| tracing::error!("Failed to compile email regex: {}", e))
        .ok()
});

/// Trim, check and lowercase an email address
pub(crate) fn validate_email(email: &str) -> Result<String> {
    let pattern = EMAIL_PATTERN
        .as_ref()
        .ok_or_else(|| GatewayError::internal("email pattern unavailable"))?;
    let email = email.trim();
    if !pattern.is_match(email) {
        return Err(GatewayError::validation(format!(
            "'{}' is not a valid email address",
            email
        )));
    }
    Ok(email.to_ascii_lowercase())
}
