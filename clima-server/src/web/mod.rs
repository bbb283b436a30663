pub mod api;
pub mod middleware;

use crate::state::AppState;
use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Result<Router> {
    let state = Arc::new(state);

    // Credentialed CORS for exactly the configured frontend origin. With
    // credentials allowed the wildcard is forbidden, so methods and headers
    // mirror the preflight request instead of `*`.
    let origin: HeaderValue = state
        .config
        .frontend_origin
        .parse()
        .with_context(|| format!("Invalid frontend origin: {}", state.config.frontend_origin))?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request());

    Ok(Router::new()
        .route("/api/weather", get(api::get_weather))
        .route("/api/health", get(api::health))
        .route("/api/config", get(api::get_config))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}
