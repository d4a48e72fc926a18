//! Helper functions for creating specific error types

use super::types::GatewayError;

/// Helper functions for creating specific errors
impl GatewayError {
    pub fn permission_denied<R: ToString, A: ToString>(resource: R, action: A) -> Self {
        Self::PermissionDenied {
            resource: resource.to_string(),
            action: action.to_string(),
        }
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn elevation_denied<S: Into<String>>(message: S) -> Self {
        Self::ElevationDenied(message.into())
    }

    pub fn already_in_state<S: Into<String>>(message: S) -> Self {
        Self::AlreadyInState(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict(message.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether the error is a guard or authorization rejection raised before any write
    pub fn is_guard_rejection(&self) -> bool {
        matches!(
            self,
            Self::AuthenticationRequired
                | Self::OrganizationMismatch
                | Self::PermissionDenied { .. }
                | Self::ElevationDenied(_)
                | Self::LastAdminProtected
                | Self::SelfActionDenied
                | Self::AlreadyInState(_)
                | Self::Validation(_)
        )
    }
}
