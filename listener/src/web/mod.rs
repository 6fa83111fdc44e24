//! Web server module for receiving signed webhooks.
//!
//! # Endpoints
//!
//! - `POST /webhook` - Verifies `X-Hub-Signature-256` and logs the delivery
//! - `GET /health` - Returns 200 if the server is running

pub mod handlers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{health, webhook, AppState, HealthResponse, WebhookError};
pub use signature::{
    compute_signature, format_signature_header, verify_signature, SIGNATURE_HEADER,
};

/// Build the router with all endpoints.
///
/// `/webhook` only routes POST, so any other method gets 405 before a handler
/// runs or the body is touched.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", post(webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
