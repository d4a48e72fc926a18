//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod audit;
pub mod handoffs;
pub mod health;
pub mod organizations;
pub mod team;
pub mod webhooks;

use crate::core::outcome::MutationOutcome;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Standard API response structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Additional metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<serde_json::Value>,
}

impl<T> ApiResponse<T>
where
    T: serde::Serialize,
{
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: None,
        }
    }

    /// Create a successful response with metadata
    pub fn success_with_meta(data: T, meta: serde_json::Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            meta: Some(meta),
        }
    }
}

/// Render an idempotent mutation; `meta.changed` tells a no-op apart
pub(crate) fn outcome_response<T: serde::Serialize>(outcome: MutationOutcome<T>) -> HttpResponse {
    let changed = outcome.is_applied();
    HttpResponse::Ok().json(ApiResponse::success_with_meta(
        outcome.into_value(),
        json!({ "changed": changed }),
    ))
}

/// Mount every route
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(health::configure_routes).service(
        web::scope("/v1/organizations")
            .configure(organizations::configure_routes)
            .service(
                web::scope("/{org_id}")
                    .route("", web::get().to(organizations::get_organization))
                    .configure(team::configure_routes)
                    .configure(handoffs::configure_routes)
                    .configure(webhooks::configure_routes)
                    .configure(audit::configure_routes),
            ),
    );
}
