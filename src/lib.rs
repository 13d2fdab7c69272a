//! Vietnam Discovery - travel discovery backend
//!
//! This library resolves a free-text place name to coordinates, fetches
//! points of interest around it, annotates each with current weather, and
//! exposes the pipeline plus a small translation helper over HTTP.

pub mod api;
pub mod config;
pub mod error;
pub mod geocode;
pub mod models;
pub mod poi;
pub mod search;
pub mod session;
pub mod translate;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use config::DiscoveryConfig;
pub use error::DiscoveryError;
pub use geocode::{Geocoder, NominatimGeocoder};
pub use models::{
    Coordinates, DEFAULT_CENTER, PointOfInterest, SearchResult, SearchStatus, WeatherInfo,
};
pub use poi::{OverpassPoiProvider, PoiProvider};
pub use search::SearchOrchestrator;
pub use session::{Identity, SessionStore};
pub use translate::TranslateClient;
pub use weather::{OpenMeteoWeather, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
