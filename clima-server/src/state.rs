use clima_core::identity::IdentityResolver;
use clima_core::{Config, WeatherService};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub resolver: Arc<dyn IdentityResolver>,
    pub weather: Arc<WeatherService>,
}

impl AppState {
    pub fn new(
        config: Config,
        resolver: Box<dyn IdentityResolver>,
        weather: WeatherService,
    ) -> Self {
        Self {
            config: Arc::new(config),
            resolver: Arc::from(resolver),
            weather: Arc::new(weather),
        }
    }
}
