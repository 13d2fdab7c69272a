//! Points of interest returned by a search

use serde::{Deserialize, Serialize};

use super::{Coordinates, WeatherInfo};

/// One point of interest near a searched location.
///
/// Identity is positional: a POI has no persistent identifier, its rank is
/// its index in the result list. `weather` starts out empty and is attached
/// at most once by the search orchestrator during the enrichment step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointOfInterest {
    /// Display name, never empty
    pub name: String,
    /// One-line description
    pub description: String,
    /// Where the POI sits on the map
    pub coordinates: Coordinates,
    /// Current weather, absent when the lookup failed or was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherInfo>,
}

impl PointOfInterest {
    /// Create a POI without weather attached
    #[must_use]
    pub fn new(name: String, description: String, coordinates: Coordinates) -> Self {
        Self {
            name,
            description,
            coordinates,
            weather: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weather_omitted_from_json_when_absent() {
        let poi = PointOfInterest::new(
            "Dragon Bridge".to_string(),
            "Landmark bridge over the Han river".to_string(),
            Coordinates::new(16.0614, 108.2272),
        );
        let json = serde_json::to_value(&poi).unwrap();
        assert!(json.get("weather").is_none());
    }

    #[test]
    fn test_weather_present_in_json_when_set() {
        let mut poi = PointOfInterest::new(
            "Marble Mountains".to_string(),
            "Cluster of marble and limestone hills".to_string(),
            Coordinates::new(16.0039, 108.2631),
        );
        poi.weather = Some(WeatherInfo {
            temperature: 29,
            description: "Partly cloudy".to_string(),
            icon: "☁️".to_string(),
        });
        let json = serde_json::to_value(&poi).unwrap();
        assert_eq!(json["weather"]["temperature"], 29);
    }
}
