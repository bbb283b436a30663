use crate::state::AppState;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use clima_core::Identity;
use serde_json::json;
use std::sync::Arc;

/// Extractor that takes the bearer token from the `Authorization` header and
/// runs it through the configured identity resolver.
///
/// A missing or malformed header is rejected at the transport with the
/// standard bearer challenge; what "valid" means beyond that is up to the
/// resolver (pass-through behind a gateway, or in-process JWT checks).
#[derive(Debug)]
pub struct AuthUser(pub Identity);

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(header::AUTHORIZATION) {
            Some(value) => match value.to_str() {
                Ok(val) => match val.strip_prefix("Bearer ") {
                    Some(t) => t,
                    None => return Err(challenge("Invalid authorization header format")),
                },
                Err(_) => return Err(challenge("Invalid authorization header format")),
            },
            None => return Err(challenge("Missing authorization header")),
        };

        match state.resolver.resolve(token) {
            Ok(identity) => Ok(AuthUser(identity)),
            Err(_) => Err(challenge("Invalid or expired token")),
        }
    }
}

fn challenge(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(json!({"error": message})),
    )
        .into_response()
}
