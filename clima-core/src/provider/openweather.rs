use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::provider::{Conditions, FetchError};

use super::WeatherProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    /// Build a provider with a bounded request timeout. A slow upstream
    /// becomes [`FetchError::Timeout`] instead of holding the request open.
    pub fn new(api_key: String, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http,
        })
    }

    /// Point the provider at a different host. Used by tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, location: &str) -> Result<Conditions, FetchError> {
        let url = format!("{}/data/2.5/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", location),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::UpstreamStatus {
                status,
                body: truncate_body(&body),
            });
        }

        let parsed: OwCurrentResponse =
            serde_json::from_str(&body).map_err(FetchError::Malformed)?;

        let description = parsed
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Conditions {
            temperature_c: parsed.main.temp,
            description,
            humidity_pct: parsed.main.humidity,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Back off to a char boundary; upstream error bodies can be localized
    // and a multibyte character may straddle the cut.
    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::new("test-key".into(), Duration::from_millis(500))
            .unwrap()
            .with_base_url(server.uri())
    }

    #[tokio::test]
    async fn maps_successful_response() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "Buenos Aires"))
            .and(query_param("appid", "test-key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 18.2, "humidity": 70},
                "weather": [{"description": "lluvia"}],
            })))
            .mount(&server)
            .await;

        let conditions = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap();

        assert_eq!(conditions.temperature_c, 18.2);
        assert_eq!(conditions.description, "lluvia");
        assert_eq!(conditions.humidity_pct, 70);
    }

    #[tokio::test]
    async fn empty_weather_array_maps_to_unknown() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "main": {"temp": 10.0, "humidity": 50},
                "weather": [],
            })))
            .mount(&server)
            .await;

        let conditions = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap();

        assert_eq!(conditions.description, "Unknown");
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "upstream_status");
        match err {
            FetchError::UpstreamStatus { status, body } => {
                assert_eq!(status.as_u16(), 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn localized_error_body_straddling_truncation_limit_is_upstream_error() {
        let server = MockServer::start().await;

        // 199 ASCII bytes, then a two-byte character across the 200-byte cut.
        let body = format!("{}éste es el resto del mensaje", "x".repeat(199));
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(500).set_body_string(body))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "upstream_status");
        match err {
            FetchError::UpstreamStatus { body, .. } => {
                assert!(body.ends_with("..."));
                assert_eq!(body, format!("{}...", "x".repeat(199)));
            }
            other => panic!("expected UpstreamStatus, got {other:?}"),
        }
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long_ascii = "a".repeat(300);
        assert_eq!(truncate_body(&long_ascii), format!("{}...", "a".repeat(200)));

        let straddling = format!("{}é{}", "a".repeat(199), "b".repeat(100));
        assert_eq!(truncate_body(&straddling), format!("{}...", "a".repeat(199)));

        assert_eq!(truncate_body("corto"), "corto");
    }

    #[tokio::test]
    async fn invalid_key_is_upstream_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key",
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "upstream_status");
    }

    #[tokio::test]
    async fn malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "malformed");
    }

    #[tokio::test]
    async fn missing_fields_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "weather": [{"description": "lluvia"}],
            })))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "malformed");
    }

    #[tokio::test]
    async fn slow_upstream_is_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "main": {"temp": 18.2, "humidity": 70},
                        "weather": [{"description": "lluvia"}],
                    }))
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather("Buenos Aires")
            .await
            .unwrap_err();

        assert_eq!(err.cause(), "timeout");
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        // Nothing listens on this port.
        let provider = OpenWeatherProvider::new("test-key".into(), Duration::from_millis(500))
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let err = provider.current_weather("Buenos Aires").await.unwrap_err();
        assert_eq!(err.cause(), "transport");
    }
}
