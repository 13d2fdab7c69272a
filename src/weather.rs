//! Current-weather enrichment for points of interest
//!
//! Fetches the current temperature and WMO weather code from the Open-Meteo
//! API. Weather is decorative: the provider never raises, every failure
//! collapses to an absent result so that a broken lookup can never abort or
//! degrade the rest of a search.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::models::{Coordinates, WeatherInfo};

/// Retrieves current weather for a coordinate, or nothing.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Current weather at `point`; `None` on any failure.
    async fn current(&self, point: Coordinates) -> Option<WeatherInfo>;
}

/// Weather provider backed by the Open-Meteo forecast API
pub struct OpenMeteoWeather {
    client: Client,
    base_url: String,
}

impl OpenMeteoWeather {
    /// Create a provider from the service configuration
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.services.timeout_seconds.into()))
            .user_agent(config.services.user_agent.clone())
            .build()
            .map_err(|e| DiscoveryError::service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.services.weather_base_url.clone(),
        })
    }

    async fn fetch(&self, point: Coordinates) -> Result<Option<WeatherInfo>> {
        let url = format!(
            "{}/forecast?latitude={}&longitude={}&current=temperature_2m,weather_code",
            self.base_url, point.latitude, point.longitude
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DiscoveryError::service(format!("Weather request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(DiscoveryError::service(format!(
                "Weather service returned HTTP {}",
                response.status()
            )));
        }

        let payload: open_meteo::ForecastResponse = response.json().await.map_err(|e| {
            DiscoveryError::service(format!("Failed to parse weather response: {e}"))
        })?;

        Ok(payload.current.and_then(|c| c.to_weather_info()))
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoWeather {
    #[instrument(skip(self), fields(lat = point.latitude, lng = point.longitude))]
    async fn current(&self, point: Coordinates) -> Option<WeatherInfo> {
        match self.fetch(point).await {
            Ok(Some(weather)) => {
                debug!(
                    "Weather at {}: {} {}",
                    point.format_coordinates(),
                    weather.format_temperature(),
                    weather.description
                );
                Some(weather)
            }
            Ok(None) => {
                debug!("No current weather block for {}", point.format_coordinates());
                None
            }
            Err(e) => {
                warn!(
                    "Weather lookup failed for {} (non-critical): {}",
                    point.format_coordinates(),
                    e
                );
                None
            }
        }
    }
}

/// Open-Meteo API response structures and WMO code mapping
pub(crate) mod open_meteo {
    use serde::Deserialize;

    use crate::models::WeatherInfo;

    /// Forecast response, reduced to the current-conditions block
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        pub current: Option<CurrentData>,
    }

    /// Current conditions from Open-Meteo
    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: f64,
        pub weather_code: u8,
    }

    impl CurrentData {
        /// Convert to a display-ready snapshot; non-finite temperatures
        /// count as absent.
        pub fn to_weather_info(&self) -> Option<WeatherInfo> {
            if !self.temperature.is_finite() {
                return None;
            }
            let (description, icon) = weather_code_info(self.weather_code);
            Some(WeatherInfo {
                temperature: self.temperature.round() as i32,
                description: description.to_string(),
                icon: icon.to_string(),
            })
        }
    }

    /// Map a WMO weather interpretation code to a description and glyph
    #[must_use]
    pub fn weather_code_info(code: u8) -> (&'static str, &'static str) {
        match code {
            0 => ("Clear sky", "☀️"),
            1 => ("Mainly clear", "🌤️"),
            2 => ("Partly cloudy", "☁️"),
            3 => ("Overcast", "🌥️"),
            45 | 48 => ("Fog", "🌫️"),
            51 | 53 | 55 => ("Drizzle", "🌦️"),
            56 | 57 => ("Freezing drizzle", "🌨️"),
            61 | 63 | 65 => ("Rain", "🌧️"),
            66 | 67 => ("Freezing rain", "🌨️"),
            71 | 73 | 75 => ("Snow fall", "❄️"),
            77 => ("Snow grains", "❄️"),
            80 | 81 | 82 => ("Rain showers", "⛈️"),
            85 | 86 => ("Snow showers", "❄️"),
            95 => ("Thunderstorm", "🌩️"),
            96 | 99 => ("Thunderstorm with hail", "⛈️"),
            _ => ("Unknown", "🤷"),
        }
    }
}
