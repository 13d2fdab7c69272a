use anyhow::{Context, Result};
use axum::{Router, routing::get};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};

/// Serve the discovery API until the process is stopped.
pub async fn run(state: AppState, bind: &str, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(api::root))
        .nest("/api", api::router())
        .layer(cors)
        .with_state(state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Discovery API running at http://{}", addr);
    axum::serve(listener, app)
        .await
        .with_context(|| "Server error")?;
    Ok(())
}
