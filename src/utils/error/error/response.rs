//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// Stable machine-readable code for the error
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::AuthenticationRequired => "AUTHENTICATION_REQUIRED",
            GatewayError::OrganizationMismatch => "ORGANIZATION_MISMATCH",
            GatewayError::PermissionDenied { .. } => "PERMISSION_DENIED",
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::ElevationDenied(_) => "ELEVATION_DENIED",
            GatewayError::LastAdminProtected => "LAST_ADMIN_PROTECTED",
            GatewayError::SelfActionDenied => "SELF_ACTION_DENIED",
            GatewayError::AlreadyInState(_) => "ALREADY_IN_STATE",
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::Conflict(_) => "CONFLICT",
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Jwt(_) => "AUTHENTICATION_REQUIRED",
            GatewayError::Storage(_) => "STORAGE_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::AuthenticationRequired | GatewayError::Jwt(_) => StatusCode::UNAUTHORIZED,
            GatewayError::OrganizationMismatch
            | GatewayError::PermissionDenied { .. }
            | GatewayError::ElevationDenied(_)
            | GatewayError::SelfActionDenied => StatusCode::FORBIDDEN,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::LastAdminProtected
            | GatewayError::AlreadyInState(_)
            | GatewayError::Conflict(_) => StatusCode::CONFLICT,
            GatewayError::Validation(_) | GatewayError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();

        // Infrastructure failures never leak their internals to the caller
        let message = if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(serde::Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(serde::Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
}
