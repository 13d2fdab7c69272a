//! Geographic coordinates

use serde::{Deserialize, Serialize};

/// Map center used before any search and after a failed geocode (Da Nang).
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 16.047079,
    longitude: 108.206230,
};

/// A latitude/longitude pair in decimal degrees.
///
/// Serialized as `{"lat": .., "lng": ..}` to match the wire format shared
/// with the map client. Values from upstream services are passed through
/// without range validation; only finiteness is checked at the parsing
/// boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinates {
    /// Create a new coordinate pair
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite real numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Format as a short coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_finite() {
        assert!(Coordinates::new(21.0278, 105.8342).is_finite());
        assert!(!Coordinates::new(f64::NAN, 105.8342).is_finite());
        assert!(!Coordinates::new(21.0278, f64::INFINITY).is_finite());
    }

    #[test]
    fn test_coordinates_wire_format() {
        let coords = Coordinates::new(16.047079, 108.206230);
        let json = serde_json::to_value(&coords).unwrap();
        assert_eq!(json["lat"], 16.047079);
        assert_eq!(json["lng"], 108.206230);
    }

    #[test]
    fn test_format_coordinates() {
        let coords = Coordinates::new(16.047079, 108.206230);
        assert_eq!(coords.format_coordinates(), "16.0471, 108.2062");
    }
}
