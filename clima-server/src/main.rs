use anyhow::{Context, Result};
use clima_core::config::{AuthMode, Config};
use clima_core::identity::resolver_from_config;
use clima_core::provider::provider_from_config;
use clima_core::service::WeatherService;
use clima_server::state::AppState;
use clima_server::web::build_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting clima server");

    // Refuses to start on a missing API key instead of degrading at call time
    let config = Config::from_env().context("Invalid configuration")?;

    let auth_mode = match &config.auth {
        AuthMode::Gateway => "gateway (tokens validated by the edge gateway)",
        AuthMode::Jwt { .. } => "jwt (tokens validated in-process)",
    };
    tracing::info!(
        location = %config.location,
        origin = %config.frontend_origin,
        auth = auth_mode,
        "Config loaded"
    );

    let provider = provider_from_config(&config).context("Failed to build weather provider")?;
    let weather = WeatherService::new(provider, config.location.clone());
    let resolver = resolver_from_config(&config);

    let listen = config.listen.clone();
    let state = AppState::new(config, resolver, weather);
    let app = build_router(state)?;

    let listener = tokio::net::TcpListener::bind(&listen)
        .await
        .with_context(|| format!("Failed to bind to {}", listen))?;

    tracing::info!("Server listening on {}", listen);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping...");
}
