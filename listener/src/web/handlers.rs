//! Webhook endpoint handlers.
//!
//! The webhook handler only:
//! 1. Reads the raw body
//! 2. Verifies the `X-Hub-Signature-256` signature
//! 3. Logs the delivery and returns 200 OK
//!
//! Non-POST requests never reach it; the router answers them with 405.

use std::sync::Arc;

use axum::{
    body::to_bytes,
    extract::{Request, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use http_body_util::LengthLimitError;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::web::signature::{verify_signature, SIGNATURE_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Signed Webhook
// =============================================================================

/// Errors that end a webhook request early.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The body could not be read to completion.
    #[error("error reading request body: {0}")]
    BodyRead(#[source] axum::Error),

    /// The body exceeded the configured size cap.
    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Signature missing, malformed or wrong.
    #[error("invalid signature")]
    InvalidSignature,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            WebhookError::BodyRead(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Error reading request body")
            }
            WebhookError::PayloadTooLarge { .. } => {
                (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
            }
            WebhookError::InvalidSignature => (StatusCode::UNAUTHORIZED, "Invalid signature"),
        };

        (status, message).into_response()
    }
}

/// Signed webhook endpoint.
///
/// # Response
///
/// - 200 OK: signature valid, delivery logged
/// - 401 Unauthorized: signature missing, malformed or wrong
/// - 413 Payload Too Large: body larger than `max_body_bytes`
/// - 500 Internal Server Error: body could not be read
pub async fn webhook(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, &'static str), WebhookError> {
    let (parts, body) = request.into_parts();
    let limit = state.config.max_body_bytes;

    let payload = match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) if is_length_limit(&e) => {
            warn!(limit = limit, "webhook_body_too_large");
            return Err(WebhookError::PayloadTooLarge { limit });
        }
        Err(e) => {
            error!(error = %e, "webhook_body_read_failed");
            return Err(WebhookError::BodyRead(e));
        }
    };

    // A missing or non-text header is checked like any other bad signature
    let signature = parts
        .headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if !verify_signature(state.config.webhook_secret.expose(), &payload, signature) {
        debug!(
            has_signature = !signature.is_empty(),
            body_length = payload.len(),
            "webhook_signature_invalid"
        );
        return Err(WebhookError::InvalidSignature);
    }

    info!(signature = %signature, "webhook_signature");
    info!(
        method = %parts.method,
        uri = %parts.uri,
        version = ?parts.version,
        headers = ?parts.headers,
        "webhook_request"
    );
    info!(payload = %String::from_utf8_lossy(&payload), "webhook_payload");

    Ok((StatusCode::OK, "OK"))
}

/// Whether a body read stopped because it hit the size cap.
fn is_length_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let cases = [
            (
                WebhookError::BodyRead(axum::Error::new(std::io::Error::other("reset"))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebhookError::PayloadTooLarge { limit: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (WebhookError::InvalidSignature, StatusCode::UNAUTHORIZED),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_is_length_limit() {
        assert!(!is_length_limit(&axum::Error::new(std::io::Error::other(
            "reset"
        ))));
    }

    #[tokio::test]
    async fn test_health() {
        let Json(response) = health().await;
        assert_eq!(response.status, "ok");
    }
}
