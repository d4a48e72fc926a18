//! Authentication middleware
//!
//! Resolves `Authorization: Bearer <jwt>` to the member's current record and
//! attaches an [`ActorContext`] to the request. A missing, invalid or stale
//! token leaves the request without an actor; the authorization resolver
//! then rejects it with `AuthenticationRequired`.

use crate::auth::ActorContext;
use crate::core::models::MemberStatus;
use crate::server::AppState;
use crate::server::middleware::helpers::{extract_bearer_token, is_public_route};
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::{debug, warn};

/// Auth middleware for Actix-web
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for auth middleware
pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if is_public_route(req.method(), req.path()) {
            return Box::pin(async move { service.call(req).await });
        }

        let token = extract_bearer_token(req.headers());
        let state = req.app_data::<web::Data<AppState>>().cloned();

        Box::pin(async move {
            if let (Some(token), Some(state)) = (token, state) {
                if let Some(actor) = resolve_actor(&state, &token).await {
                    debug!(member_id = %actor.member_id, "Resolved request actor");
                    req.extensions_mut().insert(actor);
                }
            } else {
                debug!(path = %req.path(), "No bearer token on protected route");
            }

            service.call(req).await
        })
    }
}

/// Token → active member → actor context
async fn resolve_actor(state: &AppState, token: &str) -> Option<ActorContext> {
    let claims = state.jwt.verify_token(token).ok()?;

    let member = match state.core.store().get_member(claims.sub).await {
        Ok(Some(member)) => member,
        Ok(None) => {
            warn!(member_id = %claims.sub, "Token subject no longer exists");
            return None;
        }
        Err(e) => {
            warn!(member_id = %claims.sub, "Failed to load token subject: {}", e);
            return None;
        }
    };

    if member.organization_id != claims.org || member.status == MemberStatus::Inactive {
        warn!(member_id = %member.id(), status = %member.status, "Token subject is no longer a member");
        return None;
    }

    Some(ActorContext::from_member(&member))
}

/// The acting member of a request, if one was resolved
#[derive(Debug, Clone)]
pub struct Actor(pub Option<ActorContext>);

impl Actor {
    pub fn context(&self) -> Option<&ActorContext> {
        self.0.as_ref()
    }
}

impl FromRequest for Actor {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Actor(req.extensions().get::<ActorContext>().cloned())))
    }
}
