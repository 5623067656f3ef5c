//! Multi-currency price comparison
//!
//! Queries the offer source once per currency, sequentially, converts every
//! successful quote into the base currency and reports the globally cheapest
//! option plus all per-currency results.

use serde::Serialize;
use tracing::{info, warn};

use super::{OfferSource, PriceQuote, SearchRequest};
use crate::exchange::{convert_to_base, RateSource};
use crate::Result;

/// Currencies compared on every search, in ranking tie-break order
pub const COMPARISON_CURRENCIES: [&str; 5] = ["USD", "EUR", "GBP", "CAD", "AUD"];

/// Reference currency all quotes are converted into for ranking
pub const BASE_CURRENCY: &str = "USD";

/// A quote annotated with its base-currency-converted price
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedQuote {
    #[serde(flatten)]
    pub quote: PriceQuote,
    /// Price converted into the base currency; the native price is untouched
    pub price_usd: f64,
}

/// Aggregate of all per-currency quotes with the cheapest highlighted
#[derive(Debug, Serialize)]
pub struct PriceComparison {
    pub lowest_currency: String,
    /// Native price of the winning quote
    pub lowest_price: f64,
    /// Winning price converted into the base currency
    pub lowest_price_usd: f64,
    pub all_results: Vec<ConvertedQuote>,
}

/// Outcome of a comparison run
///
/// An exhausted currency list is a defined result, not an error: it
/// serializes to `{"error": "No flight offers found"}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ComparisonOutcome {
    Found(PriceComparison),
    NoOffers { error: String },
}

impl ComparisonOutcome {
    fn no_offers() -> Self {
        Self::NoOffers {
            error: "No flight offers found".to_string(),
        }
    }
}

/// Orchestrates the offer source over the fixed currency list
pub struct PriceComparator<O, R> {
    offers: O,
    rates: R,
}

impl<O: OfferSource, R: RateSource> PriceComparator<O, R> {
    pub fn new(offers: O, rates: R) -> Self {
        Self { offers, rates }
    }

    /// Compare prices across all currencies and find the lowest
    ///
    /// One currency's outage never aborts the comparison; failed sub-calls
    /// are logged and skipped. Only when every sub-call fails (or returns
    /// no offers) does the run report the explicit no-offers outcome.
    pub async fn compare(&self, request: &SearchRequest) -> Result<ComparisonOutcome> {
        let mut quotes = Vec::new();

        for currency in COMPARISON_CURRENCIES {
            match self.offers.cheapest_offer(request, currency).await {
                Ok(Some(quote)) => quotes.push(quote),
                Ok(None) => info!("No offers for {currency}"),
                Err(e) => warn!("Offer search failed for {currency}: {e}"),
            }
        }

        if quotes.is_empty() {
            return Ok(ComparisonOutcome::no_offers());
        }

        let rates = self.rates.latest_rates(BASE_CURRENCY).await?;

        let all_results: Vec<ConvertedQuote> = quotes
            .into_iter()
            .map(|quote| {
                let price_usd = convert_to_base(&rates, &quote.currency, quote.price, BASE_CURRENCY);
                ConvertedQuote { quote, price_usd }
            })
            .collect();

        // Strict comparison keeps the earliest currency on exact ties
        let mut lowest = &all_results[0];
        for candidate in &all_results[1..] {
            if candidate.price_usd < lowest.price_usd {
                lowest = candidate;
            }
        }

        Ok(ComparisonOutcome::Found(PriceComparison {
            lowest_currency: lowest.quote.currency.clone(),
            lowest_price: lowest.quote.price,
            lowest_price_usd: lowest.price_usd,
            all_results,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FarecastError;
    use crate::flights::NormalizedOffer;
    use serde_json::json;
    use std::collections::HashMap;

    /// Offer source serving a fixed price per currency; unlisted currencies fail
    struct StubOffers {
        prices: HashMap<&'static str, Option<f64>>,
    }

    impl StubOffers {
        fn new(prices: &[(&'static str, Option<f64>)]) -> Self {
            Self {
                prices: prices.iter().copied().collect(),
            }
        }
    }

    impl OfferSource for StubOffers {
        async fn cheapest_offer(
            &self,
            _request: &SearchRequest,
            currency: &str,
        ) -> crate::Result<Option<PriceQuote>> {
            match self.prices.get(currency) {
                Some(Some(price)) => Ok(Some(PriceQuote {
                    currency: currency.to_string(),
                    price: *price,
                    parsed_offer: NormalizedOffer::from_offer(&json!({})),
                    raw_offer: json!({}),
                })),
                Some(None) => Ok(None),
                None => Err(FarecastError::api(format!("{currency} endpoint down"))),
            }
        }
    }

    struct StubRates(HashMap<String, f64>);

    impl RateSource for StubRates {
        async fn latest_rates(&self, _base: &str) -> crate::Result<HashMap<String, f64>> {
            Ok(self.0.clone())
        }
    }

    fn rates(entries: &[(&str, f64)]) -> StubRates {
        StubRates(
            entries
                .iter()
                .map(|(c, r)| ((*c).to_string(), *r))
                .collect(),
        )
    }

    fn request() -> SearchRequest {
        SearchRequest {
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            departure_date: "2025-12-01".to_string(),
            adults: 1,
        }
    }

    #[tokio::test]
    async fn test_lowest_is_minimum_converted_price() {
        // GBP 360 at rate 0.8 is 450 USD, cheaper than the native USD 500
        let comparator = PriceComparator::new(
            StubOffers::new(&[("USD", Some(500.0)), ("EUR", Some(468.0)), ("GBP", Some(360.0))]),
            rates(&[("EUR", 0.9), ("GBP", 0.8)]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        let ComparisonOutcome::Found(result) = outcome else {
            panic!("expected a comparison result");
        };

        assert_eq!(result.lowest_currency, "GBP");
        assert_eq!(result.lowest_price, 360.0);
        assert_eq!(result.lowest_price_usd, 450.0);
        assert_eq!(result.all_results.len(), 3);
    }

    #[tokio::test]
    async fn test_exact_tie_resolves_to_iteration_order() {
        // EUR 450 at rate 0.9 converts to exactly 500 USD; USD comes first
        let comparator = PriceComparator::new(
            StubOffers::new(&[("USD", Some(500.0)), ("EUR", Some(450.0))]),
            rates(&[("EUR", 0.9)]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        let ComparisonOutcome::Found(result) = outcome else {
            panic!("expected a comparison result");
        };

        assert_eq!(result.lowest_currency, "USD");
        assert_eq!(result.lowest_price, 500.0);
        assert_eq!(result.lowest_price_usd, 500.0);
    }

    #[tokio::test]
    async fn test_per_currency_failures_are_skipped() {
        // Only USD succeeds; every other currency errors out
        let comparator = PriceComparator::new(
            StubOffers::new(&[("USD", Some(500.0))]),
            rates(&[("EUR", 0.9)]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        let ComparisonOutcome::Found(result) = outcome else {
            panic!("expected a comparison result");
        };

        assert_eq!(result.all_results.len(), 1);
        assert_eq!(result.lowest_currency, "USD");
    }

    #[tokio::test]
    async fn test_all_failures_yield_no_offers_payload() {
        let comparator = PriceComparator::new(StubOffers::new(&[]), rates(&[]));

        let outcome = comparator.compare(&request()).await.unwrap();
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, json!({"error": "No flight offers found"}));
    }

    #[tokio::test]
    async fn test_empty_offer_sets_yield_no_offers_payload() {
        let comparator = PriceComparator::new(
            StubOffers::new(&[("USD", None), ("EUR", None)]),
            rates(&[]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        assert!(matches!(outcome, ComparisonOutcome::NoOffers { .. }));
    }

    #[tokio::test]
    async fn test_missing_rate_keeps_native_price() {
        // CAD has no rate entry, so its native price stands in for USD
        let comparator = PriceComparator::new(
            StubOffers::new(&[("USD", Some(500.0)), ("CAD", Some(400.0))]),
            rates(&[("EUR", 0.9)]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        let ComparisonOutcome::Found(result) = outcome else {
            panic!("expected a comparison result");
        };

        assert_eq!(result.lowest_currency, "CAD");
        assert_eq!(result.lowest_price_usd, 400.0);
    }

    #[tokio::test]
    async fn test_conversion_never_mutates_native_price() {
        let comparator = PriceComparator::new(
            StubOffers::new(&[("EUR", Some(450.0))]),
            rates(&[("EUR", 0.9)]),
        );

        let outcome = comparator.compare(&request()).await.unwrap();
        let ComparisonOutcome::Found(result) = outcome else {
            panic!("expected a comparison result");
        };

        let eur = &result.all_results[0];
        assert_eq!(eur.quote.price, 450.0);
        assert_eq!(eur.price_usd, 500.0);
    }
}
