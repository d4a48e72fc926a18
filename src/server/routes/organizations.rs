//! Organization endpoints

use crate::core::organization::{NewOrganization, OrganizationBootstrap};
use crate::server::middleware::Actor;
use crate::server::routes::ApiResponse;
use crate::server::state::AppState;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Configure organization routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("", web::post().to(create_organization));
}

/// Bootstrap response: the founding admin gets their first access token
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatedOrganization {
    #[serde(flatten)]
    bootstrap: OrganizationBootstrap,
    access_token: String,
    expires_in: u64,
}

/// Create an organization and its founding admin
async fn create_organization(
    state: web::Data<AppState>,
    body: web::Json<NewOrganization>,
) -> ActixResult<HttpResponse> {
    let committed = state
        .core
        .organizations()
        .create_organization(body.into_inner())
        .await?;
    let bootstrap = committed.value;
    let access_token = state.jwt.create_access_token(&bootstrap.admin)?;

    info!(organization_id = %bootstrap.organization.id(), "Organization bootstrapped over HTTP");
    Ok(HttpResponse::Created().json(ApiResponse::success(CreatedOrganization {
        bootstrap,
        access_token,
        expires_in: state.jwt.get_expiration(),
    })))
}

/// Read the caller's organization
pub async fn get_organization(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let organization = state
        .core
        .organizations()
        .get_organization(actor.context(), path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(organization)))
}
