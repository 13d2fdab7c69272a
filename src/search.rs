//! Search orchestration: geocode, fetch POIs, enrich with weather
//!
//! One user-facing operation sequences the three clients and owns the
//! visible search state. Geocode and POI failures abort the cycle; weather
//! failures never do. Overlapping searches supersede rather than cancel:
//! each run captures a generation number at start and only commits state
//! while its generation is still the newest, so a stale run's late
//! completions are ignored (last-write-wins on the visible result).

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::future;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::error::DiscoveryError;
use crate::geocode::Geocoder;
use crate::models::{Coordinates, PointOfInterest, SearchResult, SearchStatus};
use crate::poi::PoiProvider;
use crate::weather::WeatherProvider;

/// Sequences geocoding, POI lookup and weather enrichment for one query.
pub struct SearchOrchestrator {
    geocoder: Arc<dyn Geocoder>,
    pois: Arc<dyn PoiProvider>,
    weather: Arc<dyn WeatherProvider>,
    default_center: Coordinates,
    state: RwLock<SearchResult>,
    generation: AtomicU64,
}

impl SearchOrchestrator {
    /// Create an orchestrator over the three service clients
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        pois: Arc<dyn PoiProvider>,
        weather: Arc<dyn WeatherProvider>,
        default_center: Coordinates,
    ) -> Self {
        Self {
            geocoder,
            pois,
            weather,
            default_center,
            state: RwLock::new(SearchResult::idle(default_center)),
            generation: AtomicU64::new(0),
        }
    }

    /// Snapshot of the currently visible search state
    pub async fn snapshot(&self) -> SearchResult {
        self.state.read().await.clone()
    }

    /// Run one search cycle for `query`.
    ///
    /// Empty or whitespace-only queries are rejected synchronously with a
    /// validation error and no network call. Geocode and POI failures are
    /// reported through the returned result's `Failed` status, not as an
    /// `Err`. The returned snapshot is always this run's own outcome, even
    /// when a newer search superseded it and the shared state kept the
    /// newer result.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DiscoveryError::validation("Please enter a place name."));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!("Search '{}' started (generation {})", query, generation);

        // Fresh result for this cycle; center carries over until a new
        // geocode succeeds so the map does not jump prematurely.
        let mut result = SearchResult {
            query: query.to_string(),
            center: self.state.read().await.center,
            items: Vec::new(),
            status: SearchStatus::Loading,
            error_message: None,
        };
        self.commit(generation, &result).await;

        let center = match self.geocoder.resolve(query).await {
            Ok(center) => center,
            Err(err) => {
                warn!("Geocoding '{}' failed: {}", query, err);
                result.status = SearchStatus::Failed;
                result.center = self.default_center;
                result.error_message = Some(err.user_message());
                self.commit(generation, &result).await;
                return Ok(result);
            }
        };

        // Publish the resolved center immediately so the map can start
        // animating before the POIs arrive.
        result.center = center;
        self.commit(generation, &result).await;

        let items = match self.pois.fetch_near(center).await {
            Ok(items) => items,
            Err(err) => {
                // The location itself was found, so the center stays put.
                warn!("POI fetch near {} failed: {}", center.format_coordinates(), err);
                result.status = SearchStatus::Failed;
                result.error_message = Some(err.user_message());
                self.commit(generation, &result).await;
                return Ok(result);
            }
        };

        result.items = self.enrich_with_weather(items).await;
        result.status = SearchStatus::Ready;
        self.commit(generation, &result).await;

        info!(
            "Search '{}' ready with {} items ({} with weather)",
            query,
            result.items.len(),
            result.items.iter().filter(|p| p.weather.is_some()).count()
        );
        Ok(result)
    }

    /// Fan out one weather lookup per POI, wait for all of them to settle
    /// and attach the outcomes positionally.
    ///
    /// The lookups are independent and potentially slow; issuing them
    /// concurrently keeps worst-case latency at one lookup instead of one
    /// per POI. The provider never raises, so the join cannot fail and a
    /// missing outcome for item `i` leaves only item `i` weather-less.
    async fn enrich_with_weather(&self, items: Vec<PointOfInterest>) -> Vec<PointOfInterest> {
        let lookups = items.iter().map(|poi| self.weather.current(poi.coordinates));
        let outcomes = future::join_all(lookups).await;

        items
            .into_iter()
            .zip(outcomes)
            .map(|(mut poi, weather)| {
                poi.weather = weather;
                poi
            })
            .collect()
    }

    /// Apply this run's result to the shared state unless a newer search
    /// has started since.
    ///
    /// The generation is checked while holding the write lock: a newer run
    /// increments the counter before its first commit, so a stale run that
    /// was already queued on the lock still observes the newer generation
    /// here and drops its update instead of clobbering the newer result.
    async fn commit(&self, generation: u64, result: &SearchResult) {
        let mut state = self.state.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(
                "Search generation {} superseded, dropping state update",
                generation
            );
            return;
        }
        *state = result.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;

    use crate::models::{DEFAULT_CENTER, WeatherInfo};

    struct StubGeocoder {
        result: Option<Coordinates>,
    }

    #[async_trait]
    impl Geocoder for StubGeocoder {
        async fn resolve(&self, query: &str) -> Result<Coordinates> {
            self.result
                .ok_or_else(|| DiscoveryError::not_found(format!("No coordinates found for '{query}'")))
        }
    }

    struct StubPois {
        items: Vec<PointOfInterest>,
    }

    #[async_trait]
    impl PoiProvider for StubPois {
        async fn fetch_near(&self, _center: Coordinates) -> Result<Vec<PointOfInterest>> {
            Ok(self.items.clone())
        }
    }

    /// Weather keyed by coordinates; anything missing resolves to absent.
    struct StubWeather {
        by_location: HashMap<String, WeatherInfo>,
    }

    #[async_trait]
    impl WeatherProvider for StubWeather {
        async fn current(&self, point: Coordinates) -> Option<WeatherInfo> {
            self.by_location.get(&point.format_coordinates()).cloned()
        }
    }

    fn poi(name: &str, lat: f64, lng: f64) -> PointOfInterest {
        PointOfInterest::new(
            name.to_string(),
            format!("{name} description"),
            Coordinates::new(lat, lng),
        )
    }

    fn sunny() -> WeatherInfo {
        WeatherInfo {
            temperature: 30,
            description: "Clear sky".to_string(),
            icon: "☀️".to_string(),
        }
    }

    fn orchestrator(
        geocode: Option<Coordinates>,
        items: Vec<PointOfInterest>,
        weather_for: &[&PointOfInterest],
    ) -> SearchOrchestrator {
        let by_location = weather_for
            .iter()
            .map(|p| (p.coordinates.format_coordinates(), sunny()))
            .collect();
        SearchOrchestrator::new(
            Arc::new(StubGeocoder { result: geocode }),
            Arc::new(StubPois { items }),
            Arc::new(StubWeather { by_location }),
            DEFAULT_CENTER,
        )
    }

    #[tokio::test]
    async fn test_geocode_failure_resets_center_and_fails() {
        let orchestrator = orchestrator(None, vec![], &[]);
        let result = orchestrator.search("Nonexistent Place XYZ").await.unwrap();

        assert_eq!(result.status, SearchStatus::Failed);
        assert_eq!(result.center, DEFAULT_CENTER);
        assert!(result.items.is_empty());
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_poi_failure_keeps_resolved_center() {
        struct FailingPois;

        #[async_trait]
        impl PoiProvider for FailingPois {
            async fn fetch_near(&self, _center: Coordinates) -> Result<Vec<PointOfInterest>> {
                Err(DiscoveryError::service("upstream down"))
            }
        }

        let center = Coordinates::new(21.0278, 105.8342);
        let orchestrator = SearchOrchestrator::new(
            Arc::new(StubGeocoder {
                result: Some(center),
            }),
            Arc::new(FailingPois),
            Arc::new(StubWeather {
                by_location: HashMap::new(),
            }),
            DEFAULT_CENTER,
        );

        let result = orchestrator.search("Hanoi").await.unwrap();
        assert_eq!(result.status, SearchStatus::Failed);
        // Location was found even though enrichment failed.
        assert_eq!(result.center, center);
    }

    #[tokio::test]
    async fn test_empty_poi_list_is_ready_not_failed() {
        let center = Coordinates::new(11.9404, 108.4583);
        let orchestrator = orchestrator(Some(center), vec![], &[]);
        let result = orchestrator.search("Da Lat").await.unwrap();

        assert_eq!(result.status, SearchStatus::Ready);
        assert!(result.items.is_empty());
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_all_weather_missing_is_still_ready() {
        let center = Coordinates::new(21.0278, 105.8342);
        let items = vec![poi("a", 21.02, 105.83), poi("b", 21.03, 105.84)];
        let orchestrator = orchestrator(Some(center), items, &[]);

        let result = orchestrator.search("Hanoi").await.unwrap();
        assert_eq!(result.status, SearchStatus::Ready);
        assert_eq!(result.items.len(), 2);
        assert!(result.items.iter().all(|p| p.weather.is_none()));
    }

    #[tokio::test]
    async fn test_validation_error_makes_no_state_change() {
        let orchestrator = orchestrator(Some(DEFAULT_CENTER), vec![], &[]);
        let before = orchestrator.snapshot().await;

        let err = orchestrator.search("   ").await.unwrap_err();
        assert!(matches!(err, DiscoveryError::Validation { .. }));
        assert_eq!(orchestrator.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_stale_commit_queued_on_lock_is_dropped() {
        let orchestrator = Arc::new(orchestrator(Some(DEFAULT_CENTER), vec![], &[]));
        let finished = orchestrator.search("Hue").await.unwrap();
        assert_eq!(orchestrator.snapshot().await.query, "Hue");

        let stale_generation = orchestrator.generation.load(Ordering::SeqCst);
        let mut stale = finished.clone();
        stale.query = "stale run".to_string();

        // Hold the state lock so the stale commit has to queue behind it,
        // then start a newer generation while it is still waiting. The
        // commit must notice the newer generation once it finally gets the
        // lock and drop its update.
        let guard = orchestrator.state.write().await;
        let pending = {
            let orchestrator = Arc::clone(&orchestrator);
            tokio::spawn(async move { orchestrator.commit(stale_generation, &stale).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        orchestrator.generation.fetch_add(1, Ordering::SeqCst);
        drop(guard);
        pending.await.unwrap();

        assert_eq!(orchestrator.snapshot().await.query, "Hue");
    }

    #[tokio::test]
    async fn test_query_is_trimmed() {
        let center = Coordinates::new(21.0278, 105.8342);
        let orchestrator = orchestrator(Some(center), vec![], &[]);
        let result = orchestrator.search("  Hanoi  ").await.unwrap();
        assert_eq!(result.query, "Hanoi");
    }
}
