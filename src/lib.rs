//! `Farecast` - Air travel ticket price comparison with AI travel insights
//!
//! This library provides multi-currency flight-offer price comparison,
//! AI-backed travel advisory operations and PDF document processing,
//! exposed over a REST API and a companion CLI.

pub mod advisor;
pub mod api;
pub mod config;
pub mod documents;
pub mod error;
pub mod exchange;
pub mod flights;
pub mod web;

// Re-export core types for public API
pub use advisor::{AdvisorService, ChatModel, GroqClient, PricePoint};
pub use config::FarecastConfig;
pub use documents::{DocumentChunk, PdfProcessor};
pub use error::FarecastError;
pub use exchange::{ExchangeRateClient, RateSource};
pub use flights::{
    AmadeusClient, ComparisonOutcome, OfferSource, PriceComparator, PriceQuote, SearchRequest,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, FarecastError>;
