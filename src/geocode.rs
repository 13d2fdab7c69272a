//! Geocoding client for resolving free-text place names
//!
//! Resolves a place name to a coordinate pair through the Nominatim
//! (OpenStreetMap) search API. One outbound call per resolution, no retries
//! and no caching.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::models::Coordinates;

/// Resolves a free-text place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `query` to a coordinate pair.
    ///
    /// Fails with [`DiscoveryError::NotFound`] when the upstream service has
    /// no match and [`DiscoveryError::Service`] on transport failure or a
    /// malformed payload.
    async fn resolve(&self, query: &str) -> Result<Coordinates>;
}

/// Geocoder backed by the Nominatim search API
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
    country_hint: Option<String>,
}

impl NominatimGeocoder {
    /// Create a geocoder from the service configuration
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.services.timeout_seconds.into()))
            .user_agent(config.services.user_agent.clone())
            .build()
            .map_err(|e| DiscoveryError::service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.services.geocoder_base_url.clone(),
            country_hint: config.defaults.country_hint.clone(),
        })
    }

    fn scoped_query(&self, query: &str) -> String {
        match &self.country_hint {
            Some(hint) => format!("{query}, {hint}"),
            None => query.to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &str) -> Result<Coordinates> {
        let scoped = self.scoped_query(query);
        let url = format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(&scoped)
        );

        debug!("Geocoding '{}' via {}", query, self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DiscoveryError::service(format!("Geocoding request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Geocoder returned HTTP {}", response.status());
            return Err(DiscoveryError::service(format!(
                "Geocoder returned HTTP {}",
                response.status()
            )));
        }

        let places: Vec<nominatim::Place> = response.json().await.map_err(|e| {
            DiscoveryError::service(format!("Failed to parse geocoding response: {e}"))
        })?;

        let place = places
            .first()
            .ok_or_else(|| DiscoveryError::not_found(format!("No coordinates found for '{query}'")))?;

        let coords = place.to_coordinates()?;
        debug!("Resolved '{}' to {}", query, coords.format_coordinates());
        Ok(coords)
    }
}

/// Nominatim API response structures
mod nominatim {
    use serde::Deserialize;

    use crate::Result;
    use crate::error::DiscoveryError;
    use crate::models::Coordinates;

    /// One match from the Nominatim search endpoint.
    /// Nominatim serializes coordinates as decimal strings.
    #[derive(Debug, Deserialize)]
    pub struct Place {
        pub lat: String,
        pub lon: String,
    }

    impl Place {
        pub fn to_coordinates(&self) -> Result<Coordinates> {
            let latitude: f64 = self.lat.parse().map_err(|_| {
                DiscoveryError::service(format!("Invalid latitude in geocoding response: '{}'", self.lat))
            })?;
            let longitude: f64 = self.lon.parse().map_err(|_| {
                DiscoveryError::service(format!(
                    "Invalid longitude in geocoding response: '{}'",
                    self.lon
                ))
            })?;

            let coords = Coordinates::new(latitude, longitude);
            if !coords.is_finite() {
                return Err(DiscoveryError::service(
                    "Geocoding response contained non-finite coordinates",
                ));
            }
            // Out-of-range values are passed through untouched; the layer
            // only guarantees finiteness.
            Ok(coords)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::nominatim::Place;
    use super::*;

    #[test]
    fn test_place_parses_decimal_strings() {
        let place: Place =
            serde_json::from_str(r#"{"lat": "21.0278", "lon": "105.8342"}"#).unwrap();
        let coords = place.to_coordinates().unwrap();
        assert_eq!(coords, Coordinates::new(21.0278, 105.8342));
    }

    #[test]
    fn test_place_rejects_non_numeric_coordinates() {
        let place: Place = serde_json::from_str(r#"{"lat": "north", "lon": "105.8"}"#).unwrap();
        let err = place.to_coordinates().unwrap_err();
        assert!(matches!(err, DiscoveryError::Service { .. }));
    }

    #[test]
    fn test_place_rejects_non_finite_coordinates() {
        let place: Place = serde_json::from_str(r#"{"lat": "NaN", "lon": "105.8"}"#).unwrap();
        let err = place.to_coordinates().unwrap_err();
        assert!(matches!(err, DiscoveryError::Service { .. }));
    }

    #[test]
    fn test_out_of_range_coordinates_pass_through() {
        // Range validation is intentionally not this layer's job.
        let place: Place = serde_json::from_str(r#"{"lat": "95.0", "lon": "200.0"}"#).unwrap();
        let coords = place.to_coordinates().unwrap();
        assert_eq!(coords.latitude, 95.0);
        assert_eq!(coords.longitude, 200.0);
    }

    #[test]
    fn test_scoped_query_appends_country_hint() {
        let config = DiscoveryConfig::default();
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.scoped_query("Hanoi"), "Hanoi, Vietnam");
    }

    #[test]
    fn test_scoped_query_without_hint() {
        let mut config = DiscoveryConfig::default();
        config.defaults.country_hint = None;
        let geocoder = NominatimGeocoder::new(&config).unwrap();
        assert_eq!(geocoder.scoped_query("Hanoi"), "Hanoi");
    }
}
