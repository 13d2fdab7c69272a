//! Data models for the Vietnam Discovery service
//!
//! This module contains the core domain models organized by concern:
//! - Location: geographic coordinates
//! - Poi: points of interest returned by a search
//! - Weather: current weather attached to a point of interest
//! - Search: the orchestrator-owned result of one search cycle

pub mod location;
pub mod poi;
pub mod search;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, DEFAULT_CENTER};
pub use poi::PointOfInterest;
pub use search::{SearchResult, SearchStatus};
pub use weather::WeatherInfo;
