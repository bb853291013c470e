//! Current weather lookup tool.
//!
//! Resolves a free-text place name to coordinates, then fetches the current
//! conditions for those coordinates. Both calls go through the
//! [`WeatherService`] trait; [`OpenMeteoClient`] is the production
//! implementation backed by the Open-Meteo APIs.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::core::config::WeatherConfig;
use crate::domains::tools::{InputContract, ToolDefinition, ToolError, ToolOutput};

// ============================================================================
// Remote service
// ============================================================================

/// A geographic coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Current conditions at a location.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CurrentWeather {
    /// Temperature in °C.
    pub temperature: f64,
    /// Wind speed in km/h.
    pub windspeed: f64,
}

/// Geocoding and forecast lookups.
#[async_trait]
pub trait WeatherService: Send + Sync {
    /// Resolve a place name. `Ok(None)` means the lookup had no results.
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ToolError>;

    /// Fetch the current conditions at the given coordinates.
    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, ToolError>;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<Coordinates>>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

/// Open-Meteo backed [`WeatherService`].
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    /// Create a client using the configured endpoints and timeout.
    pub fn new(config: &WeatherConfig) -> Result<Self, ToolError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| ToolError::remote_service(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, ToolError> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| ToolError::remote_service(format!("Request to {} failed: {}", url, e)))?
            .error_for_status()
            .map_err(|e| ToolError::remote_service(format!("Request to {} failed: {}", url, e)))?;

        response
            .json::<T>()
            .await
            .map_err(|e| ToolError::remote_service(format!("Invalid response from {}: {}", url, e)))
    }
}

#[async_trait]
impl WeatherService for OpenMeteoClient {
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, ToolError> {
        let body: GeocodingResponse = self
            .get_json(
                &self.geocoding_url,
                &[("name", place.to_string()), ("count", "1".to_string())],
            )
            .await?;

        Ok(body.results.and_then(|results| results.into_iter().next()))
    }

    async fn current_weather(&self, at: Coordinates) -> Result<CurrentWeather, ToolError> {
        let body: ForecastResponse = self
            .get_json(
                &self.forecast_url,
                &[
                    ("latitude", at.latitude.to_string()),
                    ("longitude", at.longitude.to_string()),
                    ("current_weather", "true".to_string()),
                ],
            )
            .await?;

        Ok(body.current_weather)
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Parameters for the weather tool.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherParams {
    /// City to look up.
    pub city: String,
}

/// Current weather tool.
pub struct WeatherTool {
    service: Arc<dyn WeatherService>,
}

impl WeatherTool {
    pub fn new(service: Arc<dyn WeatherService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ToolDefinition for WeatherTool {
    const NAME: &'static str = "get-weather";
    const DESCRIPTION: &'static str =
        "Get the current temperature and wind speed for a city.";

    type Params = WeatherParams;

    fn contract() -> InputContract {
        InputContract::new().string("city", "City to get the weather for")
    }

    #[instrument(skip_all, fields(city = %params.city))]
    async fn execute(&self, params: WeatherParams) -> Result<ToolOutput, ToolError> {
        info!("Looking up weather for {}", params.city);

        let Some(at) = self.service.geocode(&params.city).await? else {
            warn!("No geocoding results for {}", params.city);
            return Ok(ToolOutput::text(format!(
                "City '{}' not found.",
                params.city
            )));
        };
        debug!(latitude = at.latitude, longitude = at.longitude, "geocoded");

        let weather = self.service.current_weather(at).await?;

        Ok(ToolOutput::text(format!(
            "{} current:\ntemperature: {}°C\nwind speed: {} km/h",
            params.city, weather.temperature, weather.windspeed
        ))
        .with_structured(serde_json::json!({
            "city": params.city,
            "latitude": at.latitude,
            "longitude": at.longitude,
            "temperature": weather.temperature,
            "windspeed": weather.windspeed,
        })))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::tools::definitions::first_text;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scripted service that records how often the forecast is requested.
    struct StubWeather {
        location: Result<Option<Coordinates>, &'static str>,
        forecast: Result<CurrentWeather, &'static str>,
        forecast_calls: AtomicUsize,
    }

    impl StubWeather {
        fn new(
            location: Result<Option<Coordinates>, &'static str>,
            forecast: Result<CurrentWeather, &'static str>,
        ) -> Arc<Self> {
            Arc::new(Self {
                location,
                forecast,
                forecast_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl WeatherService for StubWeather {
        async fn geocode(&self, _place: &str) -> Result<Option<Coordinates>, ToolError> {
            self.location.map_err(ToolError::remote_service)
        }

        async fn current_weather(&self, _at: Coordinates) -> Result<CurrentWeather, ToolError> {
            self.forecast_calls.fetch_add(1, Ordering::SeqCst);
            self.forecast.map_err(ToolError::remote_service)
        }
    }

    const SEOUL: Coordinates = Coordinates {
        latitude: 37.566,
        longitude: 126.9784,
    };

    const MILD: CurrentWeather = CurrentWeather {
        temperature: 18.5,
        windspeed: 7.2,
    };

    fn params(city: &str) -> WeatherParams {
        WeatherParams {
            city: city.to_string(),
        }
    }

    #[tokio::test]
    async fn test_weather_success() {
        let stub = StubWeather::new(Ok(Some(SEOUL)), Ok(MILD));
        let tool = WeatherTool::new(stub.clone());

        let output = tool.execute(params("Seoul")).await.unwrap();
        let text = first_text(&output.content);
        assert!(text.starts_with("Seoul current:"));
        assert!(text.contains("temperature: 18.5°C"));
        assert!(text.contains("wind speed: 7.2 km/h"));

        let structured = output.structured.unwrap();
        assert_eq!(structured["latitude"], serde_json::json!(37.566));
        assert_eq!(stub.forecast_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_weather_city_not_found_is_not_an_error() {
        let stub = StubWeather::new(Ok(None), Ok(MILD));
        let tool = WeatherTool::new(stub.clone());

        let output = tool.execute(params("Atlantis")).await.unwrap();
        assert_eq!(first_text(&output.content), "City 'Atlantis' not found.");
        assert!(output.structured.is_none());
        assert_eq!(stub.forecast_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_weather_geocoding_failure() {
        let stub = StubWeather::new(Err("connection refused"), Ok(MILD));
        let tool = WeatherTool::new(stub);

        let err = tool.execute(params("Seoul")).await.unwrap_err();
        assert!(matches!(err, ToolError::RemoteService(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_weather_forecast_failure() {
        let stub = StubWeather::new(Ok(Some(SEOUL)), Err("timed out"));
        let tool = WeatherTool::new(stub);

        let err = tool.execute(params("Seoul")).await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_geocoding_response_parsing() {
        let body: GeocodingResponse = serde_json::from_str(
            r#"{"results":[{"id":1835848,"name":"Seoul","latitude":37.566,"longitude":126.9784,"country":"South Korea"}],"generationtime_ms":0.5}"#,
        )
        .unwrap();
        assert_eq!(body.results.unwrap()[0], SEOUL);

        let empty: GeocodingResponse =
            serde_json::from_str(r#"{"generationtime_ms":0.3}"#).unwrap();
        assert!(empty.results.is_none());
    }

    #[test]
    fn test_forecast_response_parsing() {
        let body: ForecastResponse = serde_json::from_str(
            r#"{"latitude":37.55,"longitude":127.0,"current_weather":{"time":"2024-05-01T12:00","temperature":18.5,"windspeed":7.2,"winddirection":250,"weathercode":3}}"#,
        )
        .unwrap();
        assert_eq!(body.current_weather, MILD);
    }

    #[test]
    fn test_client_builds_from_config() {
        assert!(OpenMeteoClient::new(&WeatherConfig::default()).is_ok());
    }
}
