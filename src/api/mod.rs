//! HTTP API for the discovery service
//!
//! Mirrors the endpoints the map client consumes: `/api/coordinates`,
//! `/api/pois`, `/api/weather`, `/api/translate`, plus `/api/search` which
//! runs the whole orchestrated pipeline in one call, and the display-only
//! session endpoints.

use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::DiscoveryConfig;
use crate::error::DiscoveryError;
use crate::geocode::{Geocoder, NominatimGeocoder};
use crate::models::{Coordinates, PointOfInterest, SearchResult, WeatherInfo};
use crate::poi::{OverpassPoiProvider, PoiProvider};
use crate::search::SearchOrchestrator;
use crate::session::{Identity, SessionStore};
use crate::translate::TranslateClient;
use crate::weather::{OpenMeteoWeather, WeatherProvider};

/// Shared handler state: the orchestrator, the individual clients and the
/// session store.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<SearchOrchestrator>,
    pub geocoder: Arc<dyn Geocoder>,
    pub pois: Arc<dyn PoiProvider>,
    pub weather: Arc<dyn WeatherProvider>,
    pub translator: Arc<TranslateClient>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Wire up production clients from the configuration
    pub fn from_config(config: &DiscoveryConfig) -> crate::Result<Self> {
        let geocoder: Arc<dyn Geocoder> = Arc::new(NominatimGeocoder::new(config)?);
        let pois: Arc<dyn PoiProvider> = Arc::new(OverpassPoiProvider::new(config)?);
        let weather: Arc<dyn WeatherProvider> = Arc::new(OpenMeteoWeather::new(config)?);

        let default_center = Coordinates::new(
            config.defaults.center_latitude,
            config.defaults.center_longitude,
        );
        let orchestrator = Arc::new(SearchOrchestrator::new(
            Arc::clone(&geocoder),
            Arc::clone(&pois),
            Arc::clone(&weather),
            default_center,
        ));

        Ok(Self {
            orchestrator,
            geocoder,
            pois,
            weather,
            translator: Arc::new(TranslateClient::new(config)?),
            sessions: Arc::new(SessionStore::new()),
        })
    }
}

/// Request carrying a free-text place name
#[derive(Debug, Serialize, Deserialize)]
pub struct LocationRequest {
    pub location_name: String,
}

/// Request carrying a coordinate pair
#[derive(Debug, Serialize, Deserialize)]
pub struct CoordinatesRequest {
    pub lat: f64,
    pub lng: f64,
}

/// Request for the translation widget
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    #[serde(default = "default_source_lang")]
    pub source_lang: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
}

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "vi".to_string()
}

/// Translation response
#[derive(Debug, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub translated_text: String,
}

/// Error body, `detail` carries the user-facing message
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

type ErrorResponse = (StatusCode, Json<ErrorBody>);

fn error_response(err: &DiscoveryError) -> ErrorResponse {
    let status = match err {
        DiscoveryError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        DiscoveryError::NotFound { .. } => StatusCode::NOT_FOUND,
        DiscoveryError::Service { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            detail: err.user_message(),
        }),
    )
}

/// The `/api` routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/coordinates", post(get_coordinates))
        .route("/pois", post(get_pois))
        .route("/weather", post(get_weather))
        .route("/translate", post(translate))
        .route("/search", post(search))
        .route("/session", get(get_session))
        .route("/session/sign-out", post(sign_out))
}

/// Health/info endpoint at the server root
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Vietnam Discovery API is running",
        "version": crate::VERSION,
        "endpoints": {
            "coordinates": "/api/coordinates",
            "pois": "/api/pois",
            "weather": "/api/weather",
            "translate": "/api/translate",
            "search": "/api/search",
        }
    }))
}

async fn get_coordinates(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<Coordinates>, ErrorResponse> {
    let query = request.location_name.trim();
    if query.is_empty() {
        return Err(error_response(&DiscoveryError::validation(
            "Please enter a place name.",
        )));
    }

    state
        .geocoder
        .resolve(query)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

async fn get_pois(
    State(state): State<AppState>,
    Json(request): Json<CoordinatesRequest>,
) -> Result<Json<Vec<PointOfInterest>>, ErrorResponse> {
    state
        .pois
        .fetch_near(Coordinates::new(request.lat, request.lng))
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

async fn get_weather(
    State(state): State<AppState>,
    Json(request): Json<CoordinatesRequest>,
) -> Json<Option<WeatherInfo>> {
    // Absent weather serializes as null, never as an error.
    Json(
        state
            .weather
            .current(Coordinates::new(request.lat, request.lng))
            .await,
    )
}

async fn translate(
    State(state): State<AppState>,
    Json(request): Json<TranslationRequest>,
) -> Json<TranslationResponse> {
    let translated_text = state
        .translator
        .translate(&request.text, &request.source_lang, &request.target_lang)
        .await;
    Json(TranslationResponse { translated_text })
}

async fn search(
    State(state): State<AppState>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<SearchResult>, ErrorResponse> {
    state
        .orchestrator
        .search(&request.location_name)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

async fn get_session(State(state): State<AppState>) -> Json<Option<Identity>> {
    Json(state.sessions.current())
}

async fn sign_out(State(state): State<AppState>) -> StatusCode {
    state.sessions.sign_out();
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_request_language_defaults() {
        let request: TranslationRequest = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(request.source_lang, "en");
        assert_eq!(request.target_lang, "vi");
    }

    #[test]
    fn test_error_status_mapping() {
        let (status, _) = error_response(&DiscoveryError::validation("empty"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, _) = error_response(&DiscoveryError::not_found("no match"));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = error_response(&DiscoveryError::service("down"));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(!body.detail.is_empty());
    }

    #[test]
    fn test_coordinates_request_wire_shape() {
        let request: CoordinatesRequest =
            serde_json::from_str(r#"{"lat": 16.047079, "lng": 108.20623}"#).unwrap();
        assert_eq!(request.lat, 16.047079);
        assert_eq!(request.lng, 108.20623);
    }
}
