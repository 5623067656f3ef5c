//! REST API surface
//!
//! Request handlers are thin translations between HTTP parameters and the
//! underlying services. Error bodies use a `{"detail": ...}` shape:
//! validation failures map to 400, everything else to 500.

pub mod ai;
pub mod flights;
pub mod pdf;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Router,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;

use crate::advisor::{AdvisorService, GroqClient};
use crate::config::FarecastConfig;
use crate::documents::PdfProcessor;
use crate::error::FarecastError;
use crate::exchange::ExchangeRateClient;
use crate::flights::{AmadeusClient, PriceComparator};

/// Per-process application state; every request borrows the same
/// explicitly constructed clients
pub struct AppState {
    pub comparator: PriceComparator<AmadeusClient, ExchangeRateClient>,
    pub advisor: AdvisorService<GroqClient>,
    pub documents: PdfProcessor,
    pub upload_dir: PathBuf,
    pub max_upload_size: usize,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Build all service clients from configuration
    #[must_use]
    pub fn from_config(config: &FarecastConfig) -> Self {
        let comparator = PriceComparator::new(
            AmadeusClient::new(config.amadeus_credentials()),
            ExchangeRateClient::new(),
        );
        let advisor = AdvisorService::new(config.groq_api_key.clone().map(GroqClient::new));

        Self {
            comparator,
            advisor,
            documents: PdfProcessor::default(),
            upload_dir: config.upload_dir.clone(),
            max_upload_size: config.max_upload_size,
        }
    }
}

/// Assemble the `/api` router
pub fn router(state: SharedState) -> Router {
    // Body limit sits above the upload cap (headroom for multipart framing)
    // so the handler's own size check decides, with its 400 response,
    // rather than a bare 413
    let body_limit = DefaultBodyLimit::max(state.max_upload_size + 1024 * 1024);

    Router::new()
        .nest("/flights", flights::router())
        .nest("/ai", ai::router())
        .nest("/pdf", pdf::router())
        .layer(body_limit)
        .with_state(state)
}

/// HTTP-facing error wrapper
pub struct ApiError(pub FarecastError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self.0 {
            FarecastError::Validation { message } => (StatusCode::BAD_REQUEST, message.clone()),
            FarecastError::Document { message } | FarecastError::General { message } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message.clone())
            }
            other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl From<FarecastError> for ApiError {
    fn from(err: FarecastError) -> Self {
        Self(err)
    }
}
