//! `X-API-Key` authentication middleware for `/api/v1/*`.

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::server::{error::ApiError, state::AppState};

const API_KEY_HEADER: &str = "x-api-key";

/// Constant-time string comparison, to avoid leaking the configured API
/// key's length/prefix through response-timing side channels.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// Reject requests missing or presenting a mismatched `X-API-Key`, unless
/// no key is configured, in which case authentication is a no-op.
pub async fn require_api_key(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(expected) = state.config.api_key.as_deref() else {
        return Ok(next.run(req).await);
    };

    let provided = header_value(req.headers(), API_KEY_HEADER);

    match provided {
        None => Err(ApiError::Unauthorized),
        Some(value) if constant_time_eq(value, expected) => Ok(next.run(req).await),
        Some(_) => Err(ApiError::Forbidden),
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
