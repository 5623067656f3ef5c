//! Flight search endpoint

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApiError, SharedState};
use crate::error::FarecastError;
use crate::flights::{ComparisonOutcome, SearchRequest};

pub fn router() -> Router<SharedState> {
    Router::new().route("/search", get(search))
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    /// Origin airport code (e.g. JFK)
    origin: String,
    /// Destination airport code (e.g. LAX)
    destination: String,
    /// Departure date in YYYY-MM-DD format
    departure_date: String,
    /// Number of adult passengers
    #[serde(default = "default_adults")]
    adults: u16,
}

fn default_adults() -> u16 {
    1
}

/// Search for flight offers and compare prices across currencies
async fn search(
    State(state): State<SharedState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ComparisonOutcome>, ApiError> {
    validate_departure_date(&params.departure_date)?;
    validate_adults(params.adults)?;

    let request = SearchRequest {
        origin: params.origin,
        destination: params.destination,
        departure_date: params.departure_date,
        adults: params.adults,
    };

    let outcome = state.comparator.compare(&request).await?;
    Ok(Json(outcome))
}

/// Reject malformed dates before any upstream call is made
fn validate_departure_date(date: &str) -> Result<(), FarecastError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| FarecastError::validation("Invalid date format. Use YYYY-MM-DD"))
}

fn validate_adults(adults: u16) -> Result<(), FarecastError> {
    if (1..=9).contains(&adults) {
        Ok(())
    } else {
        Err(FarecastError::validation(
            "Number of adults must be between 1 and 9",
        ))
    }
}
