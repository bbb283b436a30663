use crate::config::Config;
use crate::provider::openweather::OpenWeatherProvider;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Provider-agnostic current conditions, before identity is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
}

/// Why an upstream fetch failed.
///
/// The distinction only ever reaches logs; callers of the weather service
/// receive the same fallback reading for every variant.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to the weather provider timed out")]
    Timeout(#[source] reqwest::Error),
    #[error("Failed to reach the weather provider")]
    Transport(#[source] reqwest::Error),
    #[error("Weather provider returned status {status}: {body}")]
    UpstreamStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Failed to parse weather provider response")]
    Malformed(#[source] serde_json::Error),
}

impl FetchError {
    /// Stable tag for log fields.
    pub fn cause(&self) -> &'static str {
        match self {
            FetchError::Timeout(_) => "timeout",
            FetchError::Transport(_) => "transport",
            FetchError::UpstreamStatus { .. } => "upstream_status",
            FetchError::Malformed(_) => "malformed",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else {
            FetchError::Transport(err)
        }
    }
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, location: &str) -> Result<Conditions, FetchError>;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider =
        OpenWeatherProvider::new(config.weather_api_key.clone(), config.upstream_timeout)?;
    Ok(Box::new(provider))
}
