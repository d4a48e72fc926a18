//! Webhook registration endpoints

use crate::core::webhooks::{CreateWebhookRequest, UpdateWebhookRequest};
use crate::server::middleware::Actor;
use crate::server::routes::{ApiResponse, outcome_response};
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use uuid::Uuid;

/// Configure webhook routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhooks")
            .route("", web::get().to(list_webhooks))
            .route("", web::post().to(create_webhook))
            .route("/{webhook_id}", web::patch().to(update_webhook))
            .route("/{webhook_id}", web::delete().to(delete_webhook)),
    );
}

async fn list_webhooks(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let webhooks = state
        .core
        .webhooks()
        .list(actor.context(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(webhooks)))
}

/// The response is the only place the signing secret is ever shown
async fn create_webhook(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<CreateWebhookRequest>,
) -> ActixResult<HttpResponse> {
    let created = state
        .core
        .webhooks()
        .create(actor.context(), path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

async fn update_webhook(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateWebhookRequest>,
) -> ActixResult<HttpResponse> {
    let (org_id, webhook_id) = path.into_inner();
    let outcome = state
        .core
        .webhooks()
        .update(actor.context(), org_id, webhook_id, body.into_inner())
        .await?;
    Ok(outcome_response(outcome))
}

async fn delete_webhook(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> ActixResult<HttpResponse> {
    let (org_id, webhook_id) = path.into_inner();
    state
        .core
        .webhooks()
        .delete(actor.context(), org_id, webhook_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
