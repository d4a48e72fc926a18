//! Helper functions for middleware

use crate::auth::JwtHandler;
use actix_web::http::Method;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};

/// Extract the bearer token from the Authorization header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(JwtHandler::extract_token_from_header)
        .map(str::to_string)
}

/// Check if a route is public (doesn't require an actor)
pub fn is_public_route(method: &Method, path: &str) -> bool {
    path == "/health" || (method == Method::POST && path.trim_end_matches('/') == "/v1/organizations")
}
