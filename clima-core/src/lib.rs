//! Core library for the clima weather API.
//!
//! This crate defines:
//! - Configuration loaded from the environment
//! - Identity resolution (gateway pass-through or in-process JWT)
//! - Abstraction over weather providers
//! - The normalize-or-fallback weather service
//!
//! It is used by `clima-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod identity;
pub mod model;
pub mod provider;
pub mod service;

pub use config::{AuthMode, Config, OauthEndpoints};
pub use identity::{GatewayResolver, IdentityError, IdentityResolver, JwtResolver};
pub use model::{Identity, WeatherReading};
pub use provider::{Conditions, FetchError, WeatherProvider};
pub use service::WeatherService;
