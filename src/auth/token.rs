//! Local JWT expiry evaluation.
//!
//! Tokens are self-describing: the payload segment carries a numeric `exp`
//! claim that can be decoded without contacting the server. Nothing here
//! verifies signatures - the server remains the authority on validity, this
//! is only used to avoid sending credentials that are already dead.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TokenClaims {
    exp: i64,
}

/// Decode the expiry claim from a JWT without verifying the signature.
/// Returns `None` if the token is malformed in any way.
pub fn expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: TokenClaims = serde_json::from_slice(&bytes).ok()?;
    Utc.timestamp_opt(claims.exp, 0).single()
}

/// Check whether a token's expiry claim has elapsed.
///
/// Fail-safe: a token whose expiry cannot be decoded is treated as expired,
/// so a garbled token is never attached to a request.
pub fn is_expired(token: &str) -> bool {
    match expiry(token) {
        Some(exp) => exp <= Utc::now(),
        None => true,
    }
}
