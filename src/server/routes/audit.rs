//! Audit history endpoint

use crate::core::models::AuditEntityType;
use crate::server::middleware::Actor;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use crate::storage::AuditFilter;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 100;
const MAX_LIMIT: usize = 1000;

/// Configure audit routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/audit", web::get().to(audit_history));
}

/// Query parameters for the audit listing
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditQuery {
    pub entity_type: Option<AuditEntityType>,
    pub entity_id: Option<Uuid>,
    pub limit: Option<usize>,
}

impl AuditQuery {
    /// Validate and convert to a store filter
    pub fn into_filter(self) -> Result<AuditFilter, GatewayError> {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if limit == 0 || limit > MAX_LIMIT {
            return Err(GatewayError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        Ok(AuditFilter {
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            limit: Some(limit),
        })
    }
}

async fn audit_history(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    query: web::Query<AuditQuery>,
) -> ActixResult<HttpResponse> {
    let filter = query.into_inner().into_filter()?;
    let entries = state
        .core
        .audit()
        .history(actor.context(), path.into_inner(), &filter)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(entries)))
}
