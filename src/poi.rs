//! Point-of-interest lookup around a coordinate
//!
//! Queries the Overpass API (OpenStreetMap) for tourist attractions, historic
//! sites and natural features near a center point. Individually malformed
//! entries in the upstream payload are dropped rather than failing the whole
//! call; an empty result is success with zero items.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, instrument, warn};

use crate::Result;
use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::models::{Coordinates, PointOfInterest};

/// Retrieves points of interest near a coordinate.
#[async_trait]
pub trait PoiProvider: Send + Sync {
    /// Fetch an ordered list of POIs near `center`.
    ///
    /// Fails with [`DiscoveryError::Service`] on transport failure or a
    /// non-list payload. Invalid entries are discarded individually, the
    /// relative order of the survivors is preserved.
    async fn fetch_near(&self, center: Coordinates) -> Result<Vec<PointOfInterest>>;
}

/// POI provider backed by the Overpass API
pub struct OverpassPoiProvider {
    client: Client,
    base_url: String,
    radius_deg: f64,
    limit: usize,
}

impl OverpassPoiProvider {
    /// Create a provider from the service configuration
    pub fn new(config: &DiscoveryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.services.timeout_seconds.into()))
            .user_agent(config.services.user_agent.clone())
            .build()
            .map_err(|e| DiscoveryError::service(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.services.poi_base_url.clone(),
            radius_deg: config.defaults.search_radius_deg,
            limit: config.defaults.poi_limit,
        })
    }

    /// Build the Overpass QL query for tourist POIs around `center`
    fn build_query(&self, center: Coordinates) -> String {
        let (lat, lng, r) = (center.latitude, center.longitude, self.radius_deg);
        let bbox = format!("{},{},{},{}", lat - r, lng - r, lat + r, lng + r);
        format!(
            "[out:json][timeout:25];\n\
             (\n\
               node[\"tourism\"~\"attraction|museum|viewpoint|artwork|gallery\"]({bbox});\n\
               node[\"historic\"]({bbox});\n\
               node[\"natural\"~\"beach|cave|peak|waterfall\"]({bbox});\n\
             );\n\
             out body {limit};",
            limit = self.limit
        )
    }
}

#[async_trait]
impl PoiProvider for OverpassPoiProvider {
    #[instrument(skip(self), fields(lat = center.latitude, lng = center.longitude))]
    async fn fetch_near(&self, center: Coordinates) -> Result<Vec<PointOfInterest>> {
        let query = self.build_query(center);
        debug!("Querying Overpass near {}", center.format_coordinates());

        let response = self
            .client
            .post(&self.base_url)
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|e| DiscoveryError::service(format!("POI request failed: {e}")))?;

        if !response.status().is_success() {
            warn!("Overpass returned HTTP {}", response.status());
            return Err(DiscoveryError::service(format!(
                "POI service returned HTTP {}",
                response.status()
            )));
        }

        let payload: overpass::Response = response
            .json()
            .await
            .map_err(|e| DiscoveryError::service(format!("Failed to parse POI response: {e}")))?;

        let total = payload.elements.len();
        let (pois, dropped) = overpass::collect_valid(payload.elements, self.limit);
        if dropped > 0 {
            debug!("Dropped {} of {} POI entries as malformed", dropped, total);
        }

        debug!("Found {} POIs near {}", pois.len(), center.format_coordinates());
        Ok(pois)
    }
}

/// Overpass API response structures and entry validation
pub(crate) mod overpass {
    use serde::Deserialize;
    use std::collections::HashMap;

    use crate::models::{Coordinates, PointOfInterest};

    /// Top-level Overpass payload. Anything that is not an element list is a
    /// service error at the deserialization boundary.
    #[derive(Debug, Deserialize)]
    pub struct Response {
        #[serde(default)]
        pub elements: Vec<Element>,
    }

    /// One raw node from Overpass. All fields optional so that a single
    /// malformed entry deserializes instead of poisoning the whole list.
    #[derive(Debug, Deserialize)]
    pub struct Element {
        pub lat: Option<f64>,
        pub lon: Option<f64>,
        #[serde(default)]
        pub tags: HashMap<String, String>,
    }

    /// Filter raw elements down to valid POIs, preserving order, and report
    /// how many entries were rejected.
    ///
    /// An entry is valid only if it carries a non-empty name and finite
    /// coordinates. Rejections are counted over the whole payload; the
    /// limit only truncates the valid survivors and never counts as a
    /// rejection.
    pub fn collect_valid(elements: Vec<Element>, limit: usize) -> (Vec<PointOfInterest>, usize) {
        let total = elements.len();
        let mut pois: Vec<PointOfInterest> =
            elements.into_iter().filter_map(validate_element).collect();
        let dropped = total - pois.len();
        pois.truncate(limit);
        (pois, dropped)
    }

    fn validate_element(element: Element) -> Option<PointOfInterest> {
        let name = element.tags.get("name")?.trim();
        if name.is_empty() {
            return None;
        }

        let coords = Coordinates::new(element.lat?, element.lon?);
        if !coords.is_finite() {
            return None;
        }

        let description = describe(&element.tags);
        Some(PointOfInterest::new(name.to_string(), description, coords))
    }

    /// Derive a one-line description from OSM tags, preferring an explicit
    /// description tag over the category.
    fn describe(tags: &HashMap<String, String>) -> String {
        if let Some(description) = tags.get("description") {
            let description = description.trim();
            if !description.is_empty() {
                return description.to_string();
            }
        }

        if let Some(kind) = tags.get("tourism") {
            format!("Tourist spot: {kind}")
        } else if let Some(kind) = tags.get("historic") {
            format!("Historic site: {kind}")
        } else if let Some(kind) = tags.get("natural") {
            format!("Natural feature: {kind}")
        } else {
            "Local point of interest".to_string()
        }
    }
}
