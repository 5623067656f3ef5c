//! Exchange-rate lookup against the public exchangerate-api.com service
//!
//! Rates are fetched fresh for every comparison run and never cached, so a
//! comparison always works against a current snapshot.

use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;

use crate::error::FarecastError;
use crate::Result;

const EXCHANGE_RATE_BASE_URL: &str = "https://api.exchangerate-api.com/v4/latest";

/// Source of currency exchange rates relative to a base currency
pub trait RateSource {
    /// Fetch the rate-per-currency table for `base`
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>>;
}

/// Client for the free exchangerate-api.com rate service
pub struct ExchangeRateClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

impl ExchangeRateClient {
    /// Create a new client with default timeouts
    #[must_use]
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("Farecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: EXCHANGE_RATE_BASE_URL.to_string(),
        }
    }
}

impl Default for ExchangeRateClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RateSource for ExchangeRateClient {
    async fn latest_rates(&self, base: &str) -> Result<HashMap<String, f64>> {
        let url = format!("{}/{}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FarecastError::api(format!("Exchange rate request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FarecastError::api(format!(
                "Exchange rate service error {}",
                response.status()
            )));
        }

        let rates: RatesResponse = response
            .json()
            .await
            .map_err(|e| FarecastError::api(format!("Failed to parse exchange rates: {e}")))?;

        Ok(rates.rates)
    }
}

/// Convert `price` denominated in `currency` into the base currency.
///
/// Rates are expressed as base-per-unit, so conversion divides by the rate.
/// A price already in the base currency is returned unchanged. When the
/// rate table has no entry for `currency`, the native price is returned
/// as an approximation and a warning is logged.
#[must_use]
pub fn convert_to_base(rates: &HashMap<String, f64>, currency: &str, price: f64, base: &str) -> f64 {
    if currency == base {
        return price;
    }

    match rates.get(currency) {
        Some(rate) => price / rate,
        None => {
            warn!(
                "No {} exchange rate for {currency}; using native price as approximation",
                base
            );
            price
        }
    }
}
