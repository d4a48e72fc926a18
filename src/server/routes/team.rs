//! Team member endpoints

use crate::auth::{Action, Resource};
use crate::core::models::MemberStatus;
use crate::core::team::{NewMember, UpdateMember};
use crate::server::middleware::Actor;
use crate::server::routes::{ApiResponse, outcome_response};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::{HttpResponse, Result as ActixResult, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

/// Configure team routes
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/team/members")
            .route("", web::get().to(list_members))
            .route("", web::post().to(create_member))
            .route("/{member_id}", web::patch().to(update_member))
            .route("/{member_id}", web::delete().to(remove_member))
            .route("/{member_id}/status", web::put().to(update_status))
            .route("/{member_id}/reactivate", web::post().to(reactivate_member))
            .route("/{member_id}/tokens", web::post().to(issue_token)),
    );
}

#[derive(Debug, Deserialize)]
struct StatusRequest {
    status: MemberStatus,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IssuedToken {
    member_id: Uuid,
    access_token: String,
    expires_in: u64,
}

async fn list_members(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
) -> ActixResult<HttpResponse> {
    let members = state
        .core
        .team()
        .list_members(actor.context(), path.into_inner())
        .await?;
    let total = members.len();
    Ok(HttpResponse::Ok().json(ApiResponse::success_with_meta(
        members,
        json!({ "total": total }),
    )))
}

async fn create_member(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<Uuid>,
    body: web::Json<NewMember>,
) -> ActixResult<HttpResponse> {
    let committed = state
        .core
        .team()
        .create_member(actor.context(), path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(committed.value)))
}

async fn update_member(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateMember>,
) -> ActixResult<HttpResponse> {
    let (org_id, member_id) = path.into_inner();
    let outcome = state
        .core
        .team()
        .update_member(actor.context(), org_id, member_id, body.into_inner())
        .await?;
    Ok(outcome_response(outcome))
}

async fn update_status(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<StatusRequest>,
) -> ActixResult<HttpResponse> {
    let (org_id, member_id) = path.into_inner();
    let outcome = state
        .core
        .team()
        .update_status(actor.context(), org_id, member_id, body.status)
        .await?;
    Ok(outcome_response(outcome))
}

async fn remove_member(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> ActixResult<HttpResponse> {
    let (org_id, member_id) = path.into_inner();
    let outcome = state
        .core
        .team()
        .remove_member(actor.context(), org_id, member_id)
        .await?;
    Ok(outcome_response(outcome))
}

async fn reactivate_member(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> ActixResult<HttpResponse> {
    let (org_id, member_id) = path.into_inner();
    let outcome = state
        .core
        .team()
        .reactivate_member(actor.context(), org_id, member_id)
        .await?;
    Ok(outcome_response(outcome))
}

/// Mint an access token for a member, e.g. an AI agent's service credential
async fn issue_token(
    state: web::Data<AppState>,
    actor: Actor,
    path: web::Path<(Uuid, Uuid)>,
) -> ActixResult<HttpResponse> {
    let (org_id, member_id) = path.into_inner();
    let admin =
        state
            .core
            .resolver()
            .require_admin(actor.context(), org_id, Resource::Team, Action::Update)?;

    let member = state
        .core
        .store()
        .get_member(member_id)
        .await?
        .filter(|member| member.organization_id == org_id)
        .ok_or_else(|| GatewayError::not_found(format!("team member {}", member_id)))?;
    if member.status == MemberStatus::Inactive {
        return Err(GatewayError::validation("cannot issue a token to an inactive member").into());
    }

    let access_token = state.jwt.create_access_token(&member)?;
    info!(
        organization_id = %org_id,
        member_id = %member_id,
        issued_by = %admin.member_id,
        "Issued member access token"
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(IssuedToken {
        member_id,
        access_token,
        expires_in: state.jwt.get_expiration(),
    })))
}
