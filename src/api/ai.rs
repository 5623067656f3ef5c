//! AI advisory endpoints
//!
//! Handlers here never fail on model flakiness; the advisor service absorbs
//! every model-side problem into its fallback payloads. The only client
//! error is a missing query for `/parse-query`.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::{ApiError, SharedState};
use crate::advisor::PricePoint;
use crate::error::FarecastError;

pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/recommendations", post(recommendations))
        .route("/analyze-prices", post(analyze_prices))
        .route("/destination-insights/{destination}", get(destination_insights))
        .route("/parse-query", post(parse_query))
}

/// Get AI-powered travel recommendations for a search context
async fn recommendations(
    State(state): State<SharedState>,
    Json(search_data): Json<Value>,
) -> Json<Value> {
    Json(state.advisor.travel_recommendations(&search_data).await)
}

#[derive(Debug, Deserialize)]
struct AnalyzePricesBody {
    #[serde(default)]
    prices: Vec<PricePoint>,
}

/// Analyze price trends and provide insights
async fn analyze_prices(
    State(state): State<SharedState>,
    Json(body): Json<AnalyzePricesBody>,
) -> Json<Value> {
    Json(state.advisor.analyze_price_trends(&body.prices).await)
}

/// Get AI insights about a destination
async fn destination_insights(
    State(state): State<SharedState>,
    Path(destination): Path<String>,
) -> Json<Value> {
    Json(state.advisor.destination_insights(&destination).await)
}

#[derive(Debug, Deserialize)]
struct ParseQueryBody {
    #[serde(default)]
    query: String,
}

/// Parse a natural language flight search query
async fn parse_query(
    State(state): State<SharedState>,
    Json(body): Json<ParseQueryBody>,
) -> Result<Json<Value>, ApiError> {
    if body.query.is_empty() {
        return Err(FarecastError::validation("Query is required").into());
    }

    Ok(Json(state.advisor.parse_query(&body.query).await))
}
