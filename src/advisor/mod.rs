//! AI travel advisory service
//!
//! Four stateless operations (recommendations, price-trend analysis,
//! destination insights, free-text query parsing) backed by a hosted chat
//! model. The model is untrusted and non-deterministic, so every call is
//! gated: the response must look like JSON and parse as JSON, otherwise a
//! fixed per-operation fallback payload is returned. Callers never see a
//! raw model error.

pub mod groq;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use anyhow::{anyhow, Result};

pub use groq::{ChatModel, GroqClient};

/// One currency/price pair for trend analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricePoint {
    pub currency: String,
    pub price: f64,
}

/// Travel advisory service wrapping an optional chat model
///
/// `None` means no credential is configured; every operation then returns
/// its documented "feature unavailable" payload without touching the
/// network. That is a defined success path, not an error.
pub struct AdvisorService<M> {
    model: Option<M>,
}

impl<M: ChatModel> AdvisorService<M> {
    pub fn new(model: Option<M>) -> Self {
        Self { model }
    }

    /// AI-powered travel recommendations for a search context
    pub async fn travel_recommendations(&self, search_data: &Value) -> Value {
        let Some(model) = &self.model else {
            return json!({
                "recommendations": [],
                "insights": "AI features require Groq API key"
            });
        };

        let prompt = format!(
            "Based on this flight search: {}\n\n\
             Provide 3 personalized travel recommendations and insights:\n\
             1. Best time to travel to destination\n\
             2. Alternative destinations similar to the searched one\n\
             3. Travel tips and cost-saving advice\n\n\
             Format as JSON with keys: recommendations (array), insights (string)",
            serde_json::to_string_pretty(search_data).unwrap_or_default()
        );

        match self.structured(model, &prompt, 500, 0.7).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Travel recommendations fell back: {e}");
                json!({
                    "recommendations": [
                        "Check local events and festivals",
                        "Consider nearby destinations",
                        "Look for flexible booking options"
                    ],
                    "insights": format!("AI recommendations unavailable: {e}")
                })
            }
        }
    }

    /// Analyze price trends across currencies
    pub async fn analyze_price_trends(&self, prices: &[PricePoint]) -> Value {
        let Some(model) = &self.model else {
            return json!({
                "trend": "neutral",
                "analysis": "Price trend analysis requires Groq API key"
            });
        };

        let prices_text = prices
            .iter()
            .map(|p| format!("{}: {}", p.currency, p.price))
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "Analyze these flight prices across currencies:\n{prices_text}\n\n\
             Provide analysis on:\n\
             1. Which currency offers the best value\n\
             2. Price trend insights\n\
             3. Recommendations for booking\n\n\
             Format as JSON with keys: best_value_currency, trend_analysis, booking_recommendation"
        );

        match self.structured(model, &prompt, 300, 0.6).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Price trend analysis fell back: {e}");
                let best_value = prices
                    .first()
                    .map_or("Unknown", |p| p.currency.as_str());
                json!({
                    "best_value_currency": best_value,
                    "trend_analysis": "Price analysis temporarily unavailable",
                    "booking_recommendation": "Consider booking soon if prices are favorable"
                })
            }
        }
    }

    /// AI insights about a destination
    pub async fn destination_insights(&self, destination: &str) -> Value {
        let Some(model) = &self.model else {
            return json!({
                "insights": "Destination insights require Groq API key"
            });
        };

        let prompt = format!(
            "Provide travel insights for {destination} airport/destination:\n\
             1. Best time to visit\n\
             2. Popular attractions nearby\n\
             3. Travel tips\n\
             4. Local transportation options\n\n\
             Format as JSON with keys: best_time_to_visit, attractions, travel_tips, transportation"
        );

        match self.structured(model, &prompt, 400, 0.7).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Destination insights fell back: {e}");
                json!({
                    "best_time_to_visit": "Check local weather and events",
                    "attractions": ["Local sightseeing", "Cultural experiences"],
                    "travel_tips": ["Research visa requirements", "Check local customs"],
                    "transportation": ["Airport taxis", "Public transport", "Ride-sharing services"]
                })
            }
        }
    }

    /// Parse a natural language flight search query into structured intent
    pub async fn parse_query(&self, query: &str) -> Value {
        let Some(model) = &self.model else {
            return json!({
                "parsed": false,
                "message": "Natural language processing requires Groq API key"
            });
        };

        let prompt = format!(
            "Parse this natural language flight search query: \"{query}\"\n\n\
             Extract:\n\
             - Origin airport/city\n\
             - Destination airport/city\n\
             - Departure date (if mentioned)\n\
             - Number of passengers (if mentioned)\n\
             - Preferred currency (if mentioned)\n\
             - Any special requirements\n\n\
             Format as JSON with keys: origin, destination, departure_date, passengers, \
             currency, requirements, confidence_score\n\
             If information is not available, use null values."
        );

        match self.structured(model, &prompt, 200, 0.3).await {
            Ok(mut value) => {
                tag_airport_codes(&mut value);
                value
            }
            Err(e) => {
                warn!("Query parsing fell back: {e}");
                json!({
                    "parsed": false,
                    "message": format!("Could not parse query: {e}"),
                    "confidence_score": 0
                })
            }
        }
    }

    /// Run a completion and insist on a JSON-shaped answer
    async fn structured(
        &self,
        model: &M,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<Value> {
        let content = model.complete(prompt, max_tokens, temperature).await?;

        if !looks_like_json(&content) {
            return Err(anyhow!("model response is not JSON-shaped"));
        }

        Ok(serde_json::from_str(content.trim())?)
    }
}

/// Whether a raw model response is plausibly JSON
///
/// Anything that does not start with an object or array delimiter is prose
/// and rejected before a parse is attempted.
fn looks_like_json(content: &str) -> bool {
    matches!(content.trim().chars().next(), Some('{') | Some('['))
}

/// Tag parsed origin/destination values that look like IATA airport codes
///
/// A light heuristic: exactly three uppercase ASCII letters. Not validated
/// against a real airport table.
fn tag_airport_codes(value: &mut Value) {
    let Some(map) = value.as_object_mut() else {
        return;
    };

    for (field, tag) in [("origin", "origin_type"), ("destination", "destination_type")] {
        let is_code = map
            .get(field)
            .and_then(Value::as_str)
            .is_some_and(|s| s.len() == 3 && s.chars().all(|c| c.is_ascii_uppercase()));
        if is_code {
            map.insert(tag.to_string(), json!("airport_code"));
        }
    }
}
