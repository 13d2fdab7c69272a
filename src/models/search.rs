//! Orchestrator-owned search state

use serde::{Deserialize, Serialize};

use super::{Coordinates, DEFAULT_CENTER, PointOfInterest};

/// Lifecycle of one search cycle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// No search has run yet
    Idle,
    /// A search is in flight
    Loading,
    /// The search completed, `items` holds the merged list
    Ready,
    /// Geocoding or the POI fetch failed
    Failed,
}

/// The visible result of the most recent search.
///
/// A fresh `SearchResult` is produced for every user-initiated search and
/// wholesale replaces the previous one; there is no incremental update.
/// `center` always reflects the most recent successful geocode and falls
/// back to [`DEFAULT_CENTER`] when geocoding fails.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResult {
    /// The query text as entered (trimmed)
    pub query: String,
    /// Map center the presentation layer should show
    pub center: Coordinates,
    /// Ranked points of interest, order as returned by the POI fetcher
    pub items: Vec<PointOfInterest>,
    /// Where this search is in its lifecycle
    pub status: SearchStatus,
    /// User-facing message when `status` is `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl SearchResult {
    /// State before any search has been issued
    #[must_use]
    pub fn idle(center: Coordinates) -> Self {
        Self {
            query: String::new(),
            center,
            items: Vec::new(),
            status: SearchStatus::Idle,
            error_message: None,
        }
    }
}

impl Default for SearchResult {
    fn default() -> Self {
        Self::idle(DEFAULT_CENTER)
    }
}
