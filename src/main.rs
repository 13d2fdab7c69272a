use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use vietnam_discovery::api::AppState;
use vietnam_discovery::config::{DiscoveryConfig, LoggingConfig};
use vietnam_discovery::web;

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .with_context(|| format!("Invalid log level '{}'", logging.level))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = DiscoveryConfig::load()?;
    init_tracing(&config.logging)?;

    tracing::info!(
        "Starting vietnam-discovery {} (geocoder: {}, poi: {}, weather: {})",
        vietnam_discovery::VERSION,
        config.services.geocoder_base_url,
        config.services.poi_base_url,
        config.services.weather_base_url,
    );

    let state = AppState::from_config(&config)?;
    web::run(state, &config.server.bind, config.server.port).await
}
