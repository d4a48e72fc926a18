//! Error types for the CRM gateway

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
///
/// The first block mirrors the domain taxonomy surfaced to callers. Guard and
/// authorization failures are always raised before any write is staged.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// No actor could be resolved for the request
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The actor belongs to a different organization than the one addressed
    #[error("You do not belong to this organization")]
    OrganizationMismatch,

    /// The actor's effective permission set does not allow the operation
    #[error("Permission denied: cannot {action} {resource}")]
    PermissionDenied { resource: String, action: String },

    /// Entity missing (or not visible to the caller)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Attempt to grant or touch a role above the actor's own rank
    #[error("Elevation denied: {0}")]
    ElevationDenied(String),

    /// The change would leave the organization without an active admin
    #[error("The organization must keep at least one active admin")]
    LastAdminProtected,

    /// The operation may not target the acting member's own record
    #[error("You cannot perform this action on your own membership")]
    SelfActionDenied,

    /// The entity is already in the requested state
    #[error("Already in state: {0}")]
    AlreadyInState(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Optimistic concurrency conflict at commit time
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Storage collaborator errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JWT errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Crypto errors
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
