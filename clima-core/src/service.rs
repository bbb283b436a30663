use crate::model::{Identity, WeatherReading};
use crate::provider::WeatherProvider;

/// Fetches current conditions for the one configured location and shapes
/// them for the frontend.
#[derive(Debug)]
pub struct WeatherService {
    provider: Box<dyn WeatherProvider>,
    location: String,
}

impl WeatherService {
    pub fn new(provider: Box<dyn WeatherProvider>, location: String) -> Self {
        Self { provider, location }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Fetch a reading for the resolved identity. Never errors: any upstream
    /// failure is absorbed into the fixed fallback reading, with the cause
    /// recorded in the logs so operators can still tell a dead provider from
    /// a misconfigured key or a garbage response.
    pub async fn fetch_weather(&self, identity: &Identity) -> WeatherReading {
        match self.provider.current_weather(&self.location).await {
            Ok(conditions) => WeatherReading {
                location: self.location.clone(),
                temperature_c: conditions.temperature_c,
                description: conditions.description,
                humidity_pct: conditions.humidity_pct,
                requested_by: identity.display_name.clone(),
            },
            Err(err) => {
                tracing::warn!(
                    cause = err.cause(),
                    error = %err,
                    "Weather provider call failed, serving fallback reading"
                );
                WeatherReading::fallback(&self.location, identity)
            }
        }
    }
}
