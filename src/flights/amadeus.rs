//! Amadeus flight-offer API client
//!
//! Authenticates via the client-credentials token exchange and queries the
//! flight-offers endpoint for one route/date/currency combination, keeping
//! only the cheapest offer of the returned set.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{OfferSource, PriceQuote, SearchRequest};
use crate::error::FarecastError;
use crate::Result;

const AMADEUS_BASE_URL: &str = "https://test.api.amadeus.com";

/// Maximum number of offers requested per search
const MAX_OFFERS: u8 = 10;

/// Amadeus API client
pub struct AmadeusClient {
    client: Client,
    credentials: Option<(String, String)>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct OffersResponse {
    #[serde(default)]
    data: Vec<Value>,
}

impl AmadeusClient {
    /// Create a new client; `credentials` is `(api_key, api_secret)`
    #[must_use]
    pub fn new(credentials: Option<(String, String)>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("Farecast/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            credentials,
            base_url: AMADEUS_BASE_URL.to_string(),
        }
    }

    /// Obtain a bearer token via the client-credentials exchange
    async fn access_token(&self) -> Result<String> {
        let (api_key, api_secret) = self.credentials.as_ref().ok_or_else(|| {
            FarecastError::config("Amadeus API credentials are not configured")
        })?;

        let response = self
            .client
            .post(format!("{}/v1/security/oauth2/token", self.base_url))
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", api_key.as_str()),
                ("client_secret", api_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| FarecastError::api(format!("Token request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FarecastError::api(format!(
                "Amadeus token exchange failed with status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FarecastError::api(format!("Failed to parse token response: {e}")))?;

        Ok(token.access_token)
    }
}

impl OfferSource for AmadeusClient {
    async fn cheapest_offer(
        &self,
        request: &SearchRequest,
        currency: &str,
    ) -> Result<Option<PriceQuote>> {
        let token = self.access_token().await?;

        debug!(
            "Searching {} -> {} on {} in {currency}",
            request.origin, request.destination, request.departure_date
        );

        let response = self
            .client
            .get(format!("{}/v2/shopping/flight-offers", self.base_url))
            .bearer_auth(token)
            .query(&[
                ("originLocationCode", request.origin.as_str()),
                ("destinationLocationCode", request.destination.as_str()),
                ("departureDate", request.departure_date.as_str()),
                ("adults", &request.adults.to_string()),
                ("currencyCode", currency),
                ("max", &MAX_OFFERS.to_string()),
            ])
            .send()
            .await
            .map_err(|e| FarecastError::api(format!("Offer search failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FarecastError::api(format!(
                "Amadeus offer search failed with status {}",
                response.status()
            )));
        }

        let offers: OffersResponse = response
            .json()
            .await
            .map_err(|e| FarecastError::api(format!("Failed to parse offer response: {e}")))?;

        Ok(select_cheapest(offers.data, currency))
    }
}

/// Pick the offer with the numerically smallest total price
fn select_cheapest(offers: Vec<Value>, currency: &str) -> Option<PriceQuote> {
    let mut cheapest: Option<(f64, Value)> = None;

    for offer in offers {
        let Some(total) = offer_total(&offer) else {
            continue;
        };
        match &cheapest {
            Some((best, _)) if total >= *best => {}
            _ => cheapest = Some((total, offer)),
        }
    }

    cheapest.map(|(price, offer)| PriceQuote {
        currency: currency.to_string(),
        price,
        parsed_offer: NormalizedOffer::from_offer(&offer),
        raw_offer: offer,
    })
}

/// Read an offer's `price.total`, tolerating both string and numeric encodings
fn offer_total(offer: &Value) -> Option<f64> {
    let total = offer.get("price")?.get("total")?;
    match total {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Friendly rendering of a raw Amadeus offer
///
/// Normalization is best-effort: a raw offer missing any expected field
/// degrades to a partial object carrying a `parse_error` marker instead of
/// failing the search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedOffer {
    pub flight_info: FlightInfo,
    pub departure: FlightEndpoint,
    pub arrival: FlightEndpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baggage: Option<BaggageAllowance>,
    pub pricing: PricingBreakdown,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<Amenity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub booking_info: Option<BookingInfo>,
    /// Set when the raw offer did not match the expected shape
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightInfo {
    pub airline: String,
    pub flight_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightEndpoint {
    pub airport: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    pub time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaggageAllowance {
    pub checked_bags: u64,
    pub cabin_bags: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_fare: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub taxes_fees: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Amenity {
    pub description: String,
    pub chargeable: bool,
    #[serde(rename = "type")]
    pub amenity_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingInfo {
    pub last_ticketing_date: Option<String>,
    pub seats_available: u64,
    pub instant_ticketing: bool,
}

impl NormalizedOffer {
    /// Normalize a raw Amadeus offer into the friendly shape
    #[must_use]
    pub fn from_offer(offer: &Value) -> Self {
        Self::try_from_offer(offer).unwrap_or_else(|| Self::partial(offer))
    }

    fn try_from_offer(offer: &Value) -> Option<Self> {
        let itinerary = offer.get("itineraries")?.get(0)?;
        let segment = itinerary.get("segments")?.get(0)?;
        let price_info = offer.get("price")?;

        let departure = segment.get("departure")?;
        let arrival = segment.get("arrival")?;

        let carrier_code = segment.get("carrierCode")?.as_str()?;
        let number = segment.get("number")?.as_str()?;

        let traveler_pricing = offer.get("travelerPricings").and_then(|t| t.get(0));
        let fare_details = traveler_pricing
            .and_then(|t| t.get("fareDetailsBySegment"))
            .and_then(|f| f.get(0));

        let baggage = fare_details.map(|details| BaggageAllowance {
            checked_bags: details
                .get("includedCheckedBags")
                .and_then(|b| b.get("quantity"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
            cabin_bags: details
                .get("includedCabinBags")
                .and_then(|b| b.get("quantity"))
                .and_then(Value::as_u64)
                .unwrap_or(0),
        });

        let amenities = fare_details
            .and_then(|d| d.get("amenities"))
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .filter_map(|a| {
                        Some(Amenity {
                            description: a.get("description")?.as_str()?.to_string(),
                            chargeable: a
                                .get("isChargeable")
                                .and_then(Value::as_bool)
                                .unwrap_or(false),
                            amenity_type: a
                                .get("amenityType")
                                .and_then(Value::as_str)
                                .unwrap_or("OTHER")
                                .to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        let total = offer_total(offer)?;
        let base_fare = price_info
            .get("base")
            .and_then(|b| b.as_str()?.parse::<f64>().ok());

        Some(Self {
            flight_info: FlightInfo {
                airline: carrier_code.to_string(),
                flight_number: format!("{carrier_code}{number}"),
                aircraft: segment
                    .get("aircraft")
                    .and_then(|a| a.get("code"))
                    .and_then(Value::as_str)
                    .map(String::from),
                duration: itinerary
                    .get("duration")
                    .and_then(Value::as_str)
                    .map(String::from),
            },
            departure: endpoint_from(departure),
            arrival: endpoint_from(arrival),
            baggage,
            pricing: PricingBreakdown {
                total,
                base_fare,
                taxes_fees: base_fare.map(|base| total - base),
                currency: price_info
                    .get("currency")
                    .and_then(Value::as_str)
                    .map(String::from),
            },
            amenities,
            booking_info: Some(BookingInfo {
                last_ticketing_date: offer
                    .get("lastTicketingDate")
                    .and_then(Value::as_str)
                    .map(String::from),
                seats_available: offer
                    .get("numberOfBookableSeats")
                    .and_then(Value::as_u64)
                    .unwrap_or(0),
                instant_ticketing: offer
                    .get("instantTicketingRequired")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            parse_error: None,
        })
    }

    /// Fallback shape when the raw offer cannot be read in full
    fn partial(offer: &Value) -> Self {
        Self {
            flight_info: FlightInfo {
                airline: "Unknown".to_string(),
                flight_number: "Unknown".to_string(),
                aircraft: None,
                duration: None,
            },
            departure: FlightEndpoint {
                airport: None,
                terminal: None,
                time: None,
            },
            arrival: FlightEndpoint {
                airport: None,
                terminal: None,
                time: None,
            },
            baggage: None,
            pricing: PricingBreakdown {
                total: offer_total(offer).unwrap_or(0.0),
                base_fare: None,
                taxes_fees: None,
                currency: None,
            },
            amenities: Vec::new(),
            booking_info: None,
            parse_error: Some("Parsing failed: offer did not match expected shape".to_string()),
        }
    }
}

fn endpoint_from(value: &Value) -> FlightEndpoint {
    FlightEndpoint {
        airport: value
            .get("iataCode")
            .and_then(Value::as_str)
            .map(String::from),
        terminal: value
            .get("terminal")
            .and_then(Value::as_str)
            .map(String::from),
        time: value.get("at").and_then(Value::as_str).map(String::from),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_offer(total: &str) -> Value {
        json!({
            "price": { "total": total, "base": "400.00", "currency": "USD" },
            "lastTicketingDate": "2025-11-30",
            "numberOfBookableSeats": 4,
            "instantTicketingRequired": false,
            "itineraries": [{
                "duration": "PT6H15M",
                "segments": [{
                    "carrierCode": "AA",
                    "number": "100",
                    "aircraft": { "code": "32B" },
                    "departure": { "iataCode": "JFK", "terminal": "8", "at": "2025-12-01T08:00:00" },
                    "arrival": { "iataCode": "LAX", "at": "2025-12-01T11:15:00" }
                }]
            }],
            "travelerPricings": [{
                "fareDetailsBySegment": [{
                    "includedCheckedBags": { "quantity": 1 },
                    "includedCabinBags": { "quantity": 1 },
                    "amenities": [
                        { "description": "MEAL", "isChargeable": false, "amenityType": "MEAL" }
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_offer_total_handles_string_and_number() {
        assert_eq!(offer_total(&json!({"price": {"total": "450.50"}})), Some(450.5));
        assert_eq!(offer_total(&json!({"price": {"total": 450.5}})), Some(450.5));
        assert_eq!(offer_total(&json!({"price": {"total": true}})), None);
        assert_eq!(offer_total(&json!({})), None);
    }

    #[test]
    fn test_select_cheapest_picks_minimum_total() {
        let offers = vec![sample_offer("500.00"), sample_offer("450.00"), sample_offer("475.00")];
        let quote = select_cheapest(offers, "USD").unwrap();
        assert_eq!(quote.currency, "USD");
        assert_eq!(quote.price, 450.0);
    }

    #[test]
    fn test_select_cheapest_empty_is_none() {
        assert!(select_cheapest(Vec::new(), "USD").is_none());
    }

    #[test]
    fn test_select_cheapest_skips_unpriced_offers() {
        let offers = vec![json!({"id": "broken"}), sample_offer("480.00")];
        let quote = select_cheapest(offers, "EUR").unwrap();
        assert_eq!(quote.price, 480.0);
    }

    #[test]
    fn test_normalize_full_offer() {
        let offer = sample_offer("500.00");
        let normalized = NormalizedOffer::from_offer(&offer);

        assert!(normalized.parse_error.is_none());
        assert_eq!(normalized.flight_info.airline, "AA");
        assert_eq!(normalized.flight_info.flight_number, "AA100");
        assert_eq!(normalized.flight_info.aircraft.as_deref(), Some("32B"));
        assert_eq!(normalized.departure.airport.as_deref(), Some("JFK"));
        assert_eq!(normalized.departure.terminal.as_deref(), Some("8"));
        assert_eq!(normalized.arrival.airport.as_deref(), Some("LAX"));
        assert_eq!(normalized.pricing.total, 500.0);
        assert_eq!(normalized.pricing.base_fare, Some(400.0));
        assert_eq!(normalized.pricing.taxes_fees, Some(100.0));
        assert_eq!(normalized.baggage.as_ref().unwrap().checked_bags, 1);
        assert_eq!(normalized.amenities.len(), 1);
        assert_eq!(normalized.booking_info.as_ref().unwrap().seats_available, 4);
    }

    #[test]
    fn test_normalize_malformed_offer_degrades_with_marker() {
        let offer = json!({"price": {"total": "321.00"}});
        let normalized = NormalizedOffer::from_offer(&offer);

        assert!(normalized.parse_error.is_some());
        assert_eq!(normalized.flight_info.airline, "Unknown");
        assert_eq!(normalized.pricing.total, 321.0);
    }

    #[tokio::test]
    async fn test_access_token_without_credentials_is_config_error() {
        let client = AmadeusClient::new(None);
        let err = client.access_token().await.unwrap_err();
        assert!(matches!(err, FarecastError::Config { .. }));
    }
}
