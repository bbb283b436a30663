use anyhow::{Context, Result, bail};
use std::env;
use std::time::Duration;

/// Default listen address, matching the original deployment.
const DEFAULT_LISTEN: &str = "0.0.0.0:8000";
const DEFAULT_FRONTEND_ORIGIN: &str = "https://clima.cloud-it.com.ar";
const DEFAULT_LOCATION: &str = "Buenos Aires";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;

const DEFAULT_AUTH_URL: &str =
    "https://keycloak.cloud-it.com.ar/realms/myrealm/protocol/openid-connect/auth";
const DEFAULT_TOKEN_URL: &str =
    "https://keycloak.cloud-it.com.ar/realms/myrealm/protocol/openid-connect/token";

/// OAuth2 authorization-code endpoints of the identity issuer.
///
/// This process never calls them itself; they are published to clients for
/// discovery (the login redirect and the token exchange happen elsewhere).
#[derive(Debug, Clone)]
pub struct OauthEndpoints {
    pub authorization_url: String,
    pub token_url: String,
}

/// How bearer tokens on inbound requests are treated.
#[derive(Debug, Clone)]
pub enum AuthMode {
    /// An edge gateway has already validated the token; trust the boundary
    /// and attach the placeholder identity.
    Gateway,
    /// Validate the token in-process as an HS256 JWT with a shared secret.
    Jwt { secret: String },
}

/// Immutable process configuration, loaded once at startup.
///
/// Missing `WEATHER_API_KEY` refuses to start instead of degrading at call
/// time with a placeholder key that the provider would reject anyway.
#[derive(Debug, Clone)]
pub struct Config {
    /// Socket address to bind, e.g. "0.0.0.0:8000".
    pub listen: String,
    /// The single origin allowed by the credentialed CORS policy.
    pub frontend_origin: String,
    /// API key for the upstream weather provider.
    pub weather_api_key: String,
    /// The one location this facade serves.
    pub location: String,
    /// Bound on the outbound call to the weather provider.
    pub upstream_timeout: Duration,
    pub auth: AuthMode,
    pub oauth: OauthEndpoints,
}

impl Config {
    /// Load configuration from environment variables, failing fast on
    /// anything missing or unparseable.
    pub fn from_env() -> Result<Self> {
        let weather_api_key = env::var("WEATHER_API_KEY").map_err(|_| {
            anyhow::anyhow!(
                "WEATHER_API_KEY is not set.\n\
                 Hint: export the OpenWeatherMap API key before starting the server."
            )
        })?;
        if weather_api_key.trim().is_empty() {
            bail!("WEATHER_API_KEY is set but empty");
        }

        let timeout_secs = match env::var("CLIMA_UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("Invalid CLIMA_UPSTREAM_TIMEOUT_SECS: {raw}"))?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        let auth = match env::var("CLIMA_AUTH_MODE").as_deref() {
            Ok("gateway") | Err(_) => AuthMode::Gateway,
            Ok("jwt") => {
                let secret = env::var("CLIMA_JWT_SECRET").map_err(|_| {
                    anyhow::anyhow!("CLIMA_JWT_SECRET is required when CLIMA_AUTH_MODE=jwt")
                })?;
                AuthMode::Jwt { secret }
            }
            Ok(other) => bail!(
                "Unknown CLIMA_AUTH_MODE '{other}'. Supported modes: gateway, jwt."
            ),
        };

        Ok(Self {
            listen: env_or("CLIMA_LISTEN", DEFAULT_LISTEN),
            frontend_origin: env_or("CLIMA_FRONTEND_ORIGIN", DEFAULT_FRONTEND_ORIGIN),
            weather_api_key,
            location: env_or("CLIMA_LOCATION", DEFAULT_LOCATION),
            upstream_timeout: Duration::from_secs(timeout_secs),
            auth,
            oauth: OauthEndpoints {
                authorization_url: env_or("CLIMA_AUTH_URL", DEFAULT_AUTH_URL),
                token_url: env_or("CLIMA_TOKEN_URL", DEFAULT_TOKEN_URL),
            },
        })
    }
}

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}
