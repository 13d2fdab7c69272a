//! Current weather attached to a point of interest

use serde::{Deserialize, Serialize};

/// Current weather snapshot for one location.
///
/// Produced whole by the weather enricher or not at all; a point of interest
/// never carries a partially populated `WeatherInfo`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeatherInfo {
    /// Temperature in whole degrees Celsius
    pub temperature: i32,
    /// Human-readable description of the conditions
    pub description: String,
    /// Emoji glyph for compact display next to the temperature
    pub icon: String,
}

impl WeatherInfo {
    /// Format temperature with unit
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{}°C", self.temperature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_temperature() {
        let weather = WeatherInfo {
            temperature: 31,
            description: "Clear sky".to_string(),
            icon: "☀️".to_string(),
        };
        assert_eq!(weather.format_temperature(), "31°C");
    }
}
