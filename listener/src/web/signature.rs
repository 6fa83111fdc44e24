//! `X-Hub-Signature-256` webhook signature verification.
//!
//! Senders sign the raw request body with HMAC-SHA256 using the shared secret
//! and send the digest as `sha256=<64 lowercase hex characters>`.
//! Reference: https://docs.github.com/en/webhooks/using-webhooks/validating-webhook-deliveries

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::warn;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Prefix every signature header value starts with.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Exact length of a well-formed header value: prefix plus 64 hex digits.
pub const SIGNATURE_LENGTH: usize = SIGNATURE_PREFIX.len() + 64;

/// Verify a webhook body against its `X-Hub-Signature-256` header value.
///
/// # Arguments
///
/// * `secret` - The shared webhook secret
/// * `payload` - The raw request body, exactly as received
/// * `signature` - The header value, e.g. `sha256=0f4a...`
///
/// # Returns
///
/// `true` only if the header is well formed and its hex digest is byte-for-byte
/// equal to the lowercase hex HMAC of the payload. Uppercase hex never matches.
/// An empty secret always yields `false`.
pub fn verify_signature(secret: &[u8], payload: &[u8], signature: &str) -> bool {
    if signature.len() != SIGNATURE_LENGTH {
        warn!(
            expected_length = SIGNATURE_LENGTH,
            actual_length = signature.len(),
            "signature_length_invalid"
        );
        return false;
    }

    let provided = match signature.strip_prefix(SIGNATURE_PREFIX) {
        Some(hex_digest) => hex_digest,
        None => {
            warn!("signature_prefix_invalid");
            return false;
        }
    };

    let expected = match compute_signature(secret, payload) {
        Ok(digest) if !secret.is_empty() => digest,
        _ => {
            warn!("signature_secret_empty");
            return false;
        }
    };

    // Constant-time comparison to prevent timing attacks
    let valid: bool = expected.as_bytes().ct_eq(provided.as_bytes()).into();

    if !valid {
        warn!(payload_length = payload.len(), "signature_mismatch");
    }

    valid
}

/// Compute the lowercase hex HMAC-SHA256 of `payload` keyed by `secret`.
pub fn compute_signature(secret: &[u8], payload: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Format a hex digest as a header value (`sha256=<hex>`).
pub fn format_signature_header(hex_digest: &str) -> String {
    format!("{}{}", SIGNATURE_PREFIX, hex_digest)
}
