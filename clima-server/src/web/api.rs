use crate::state::AppState;
use crate::web::middleware::AuthUser;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// GET /api/weather -- current conditions for the configured location.
///
/// Always 200 once authenticated: upstream failure degrades to the fallback
/// reading inside the weather service, never to an error status.
pub async fn get_weather(
    AuthUser(identity): AuthUser,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    Json(state.weather.fetch_weather(&identity).await)
}

/// GET /api/health -- liveness probe, no authentication.
pub async fn health() -> impl IntoResponse {
    Json(json!({"status": "ok"}))
}

/// GET /api/config -- public endpoint publishing the identity issuer's
/// OAuth2 endpoints so clients can discover where to log in. This process
/// never calls them itself.
pub async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(json!({
        "authorization_url": state.config.oauth.authorization_url,
        "token_url": state.config.oauth.token_url,
    }))
}
