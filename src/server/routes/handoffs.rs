//! Handoff endpoints

use crate::core::handoff::HandoffRequest;
use crate::server::middleware::Actor;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Deserialize;
use uuid::Uuid;

/// Configure handoff routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/leads/{lead_id}/handoffs", web::post().to(request_handoff))
        .service(
            web::scope("/handoffs")
                .route("/pending", web::get().to(pending_handoffs))
                .route("/{handoff_id}/accept", web::post().to(accept_handoff))
                .route("/{handoff_id}/reject", web::post().to(reject_handoff)),
        );
}

/// Accept/reject body; may be omitted entirely
#[derive(Debug, Default, Deserialize)]
struct ResolveRequest {
    #[serde(default)]
    notes: Option<String>,
}

async fn request_handoff(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<HandoffRequest>,
) -> ActixResult<HttpResponse> {
    let (org_id, lead_id) = path.into_inner();
    let committed = state
        .core
        .handoffs()
        .request_handoff(actor.context(), org_id, lead_id, body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(committed.value)))
}

async fn pending_handoffs(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let pending = state
        .core
        .handoffs()
        .pending_handoffs(actor.context(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(pending)))
}

async fn accept_handoff(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: Option<web::Json<ResolveRequest>>,
) -> ActixResult<HttpResponse> {
    let (org_id, handoff_id) = path.into_inner();
    let notes = body.map(|b| b.into_inner()).unwrap_or_default().notes;
    let committed = state
        .core
        .handoffs()
        .accept_handoff(actor.context(), org_id, handoff_id, notes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(committed.value)))
}

async fn reject_handoff(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: Option<web::Json<ResolveRequest>>,
) -> ActixResult<HttpResponse> {
    let (org_id, handoff_id) = path.into_inner();
    let notes = body.map(|b| b.into_inner()).unwrap_or_default().notes;
    let committed = state
        .core
        .handoffs()
        .reject_handoff(actor.context(), org_id, handoff_id, notes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(committed.value)))
}
