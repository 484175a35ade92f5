//! Bearer token check for the management endpoint.

use http::header::AUTHORIZATION;
use http::HeaderMap;
use constant_time_eq::constant_time_eq_32;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::config::ApiToken;
use crate::errors::AppError;

/// Accepts the request only when `Authorization` is exactly `Bearer <token>`.
///
/// A missing header is treated like a wrong one. Both sides are hashed to fixed-size
/// digests first, so the comparison time depends on neither value nor length.
pub fn authorize(headers: &HeaderMap, token: &ApiToken) -> Result<(), AppError> {
    let presented = headers
        .get(AUTHORIZATION)
        .map(|v| v.as_bytes())
        .unwrap_or_default();
    let expected = token.expected_header();

    if digests_match(presented, expected.as_bytes()) {
        return Ok(());
    }

    warn!(
        "Rejected request with {} Authorization header",
        if presented.is_empty() { "missing" } else { "invalid" }
    );
    Err(AppError::Unauthorized("Invalid API token".to_string()))
}

fn digests_match(presented: &[u8], expected: &[u8]) -> bool {
    let presented: [u8; 32] = Sha256::digest(presented).into();
    let expected: [u8; 32] = Sha256::digest(expected).into();
    constant_time_eq_32(&presented, &expected)
}
