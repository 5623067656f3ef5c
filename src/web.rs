use anyhow::{Context, Result};
use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, SharedState};

/// Run the API server until shutdown
pub async fn run(state: SharedState, host: &str, port: u16) -> Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .nest("/api", api::router(state))
        .layer(cors);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("API server running at http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Farecast air travel price comparison API"
    }))
}
