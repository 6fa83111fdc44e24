//! Hubsig - minimal signed webhook listener.
//!
//! Accepts `POST /webhook`, verifies the `X-Hub-Signature-256` HMAC-SHA256
//! signature of the raw body against a shared secret, and logs authenticated
//! deliveries.
//!
//! ## Request flow
//!
//! ```text
//! POST /webhook → read body → verify signature → log delivery → 200 OK
//! ```

pub mod config;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError, WebhookSecret};
pub use web::{build_router, verify_signature, AppState};
