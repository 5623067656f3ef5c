//! Flight-offer search and multi-currency price comparison
//!
//! This module provides:
//! - The Amadeus flight-offer client (client-credentials auth, offer search,
//!   best-effort offer normalization)
//! - The price comparator that queries a fixed currency list sequentially
//!   and ranks quotes in a common base currency

pub mod amadeus;
pub mod compare;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Result;

// Re-export commonly used types from submodules
pub use amadeus::{AmadeusClient, NormalizedOffer};
pub use compare::{
    ComparisonOutcome, ConvertedQuote, PriceComparator, PriceComparison, BASE_CURRENCY,
    COMPARISON_CURRENCIES,
};

/// One flight search request: route, date and passenger count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Origin airport code (e.g. JFK)
    pub origin: String,
    /// Destination airport code (e.g. LAX)
    pub destination: String,
    /// Departure date in YYYY-MM-DD format
    pub departure_date: String,
    /// Number of adult passengers (1-9)
    pub adults: u16,
}

/// The cheapest retrieved offer for one currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    /// Currency the offer was priced in
    pub currency: String,
    /// Total price in the native currency
    pub price: f64,
    /// Friendly rendering of the winning offer
    pub parsed_offer: NormalizedOffer,
    /// Raw offer payload as returned by the upstream API
    pub raw_offer: Value,
}

/// Source of per-currency flight quotes
pub trait OfferSource {
    /// Fetch the cheapest offer for `request` priced in `currency`.
    ///
    /// Returns `Ok(None)` when the upstream has no offers for the route,
    /// which is a normal outcome rather than an error.
    async fn cheapest_offer(
        &self,
        request: &SearchRequest,
        currency: &str,
    ) -> Result<Option<PriceQuote>>;
}
