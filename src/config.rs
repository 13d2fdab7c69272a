//! Configuration management for the Vietnam Discovery service
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::DiscoveryError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::DEFAULT_CENTER;

/// Root configuration structure for the discovery service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscoveryConfig {
    /// Upstream service endpoints
    #[serde(default)]
    pub services: ServicesConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Default application settings
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Upstream service endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicesConfig {
    /// Base URL for the Nominatim geocoding API
    #[serde(default = "default_geocoder_base_url")]
    pub geocoder_base_url: String,
    /// Overpass API interpreter URL for POI lookups
    #[serde(default = "default_poi_base_url")]
    pub poi_base_url: String,
    /// Base URL for the Open-Meteo weather API
    #[serde(default = "default_weather_base_url")]
    pub weather_base_url: String,
    /// Base URL for the translation endpoint
    #[serde(default = "default_translate_base_url")]
    pub translate_base_url: String,
    /// Request timeout in seconds, shared by all clients
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u32,
    /// User agent sent to upstream services (Nominatim requires one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Default application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Maximum number of POIs returned per search
    #[serde(default = "default_poi_limit")]
    pub poi_limit: usize,
    /// POI search radius in decimal degrees (roughly 0.1 ~ 10 km)
    #[serde(default = "default_search_radius")]
    pub search_radius_deg: f64,
    /// Country appended to geocoding queries to scope results
    #[serde(default = "default_country_hint")]
    pub country_hint: Option<String>,
    /// Fallback map center latitude
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    /// Fallback map center longitude
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
}

// Default value functions
fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_poi_base_url() -> String {
    "https://overpass-api.de/api/interpreter".to_string()
}

fn default_weather_base_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_translate_base_url() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_timeout_seconds() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("vietnam-discovery/{}", env!("CARGO_PKG_VERSION"))
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_poi_limit() -> usize {
    5
}

fn default_search_radius() -> f64 {
    0.1
}

fn default_country_hint() -> Option<String> {
    Some("Vietnam".to_string())
}

fn default_center_latitude() -> f64 {
    DEFAULT_CENTER.latitude
}

fn default_center_longitude() -> f64 {
    DEFAULT_CENTER.longitude
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            geocoder_base_url: default_geocoder_base_url(),
            poi_base_url: default_poi_base_url(),
            weather_base_url: default_weather_base_url(),
            translate_base_url: default_translate_base_url(),
            timeout_seconds: default_timeout_seconds(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            poi_limit: default_poi_limit(),
            search_radius_deg: default_search_radius(),
            country_hint: default_country_hint(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
        }
    }
}

impl DiscoveryConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with DISCOVERY_ prefix
        builder = builder.add_source(
            Environment::with_prefix("DISCOVERY")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: DiscoveryConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vietnam-discovery").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_urls()?;
        self.validate_numeric_ranges()?;
        self.validate_logging()?;
        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        for (name, url) in [
            ("geocoder", &self.services.geocoder_base_url),
            ("poi", &self.services.poi_base_url),
            ("weather", &self.services.weather_base_url),
            ("translate", &self.services.translate_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(DiscoveryError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.services.timeout_seconds == 0 || self.services.timeout_seconds > 300 {
            return Err(DiscoveryError::config(
                "Request timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.defaults.poi_limit == 0 || self.defaults.poi_limit > 25 {
            return Err(DiscoveryError::config("POI limit must be between 1 and 25").into());
        }

        if !(self.defaults.search_radius_deg > 0.0 && self.defaults.search_radius_deg <= 5.0) {
            return Err(DiscoveryError::config(
                "Search radius must be between 0 and 5 degrees",
            )
            .into());
        }

        if !self.defaults.center_latitude.is_finite() || !self.defaults.center_longitude.is_finite()
        {
            return Err(DiscoveryError::config("Default center must be finite").into());
        }

        Ok(())
    }

    fn validate_logging(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(DiscoveryError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(DiscoveryError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert_eq!(
            config.services.geocoder_base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.services.weather_base_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.services.timeout_seconds, 30);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.defaults.poi_limit, 5);
        assert_eq!(config.defaults.country_hint.as_deref(), Some("Vietnam"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_url() {
        let mut config = DiscoveryConfig::default();
        config.services.weather_base_url = "ftp://example.com".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("base URL"));
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = DiscoveryConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = DiscoveryConfig::default();
        config.defaults.poi_limit = 0;
        assert!(config.validate().is_err());

        let mut config = DiscoveryConfig::default();
        config.services.timeout_seconds = 500;
        assert!(config.validate().is_err());

        let mut config = DiscoveryConfig::default();
        config.defaults.search_radius_deg = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_path_generation() {
        let path = DiscoveryConfig::get_config_path();
        assert!(path.is_some());
        let path = path.unwrap();
        assert!(path.to_string_lossy().contains("vietnam-discovery"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }
}
