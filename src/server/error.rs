//! HTTP-surface-specific error type.
//!
//! Deliberately separate from [`crate::error::Error`]: the core pipeline
//! never fails out of `process` (every failure is encoded as a
//! [`crate::core::CheckResponse`] field), so this enum only covers
//! rejections that happen before or around a call to `process`.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use thiserror::Error;

/// Errors the HTTP surface can produce on its own, outside the pipeline.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request text exceeded the configured maximum length.
    #[error("text too long: {0}")]
    TextTooLong(String),

    /// The request named a language code outside the supported set.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// No `X-API-Key` header was supplied, but one is required.
    #[error("missing API key")]
    Unauthorized,

    /// An `X-API-Key` header was supplied but did not match.
    #[error("invalid API key")]
    Forbidden,

    /// The caller exceeded the configured rate limit.
    #[error("rate limit exceeded")]
    RateLimited,

    /// The end-to-end encryption envelope could not be processed.
    #[cfg(feature = "encryption")]
    #[error("encryption error: {0}")]
    EncryptionFailure(String),

    /// Anything else unexpected.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            Self::TextTooLong(_) | Self::UnsupportedLanguage(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            #[cfg(feature = "encryption")]
            Self::EncryptionFailure(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            detail: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::error::Error> for ApiError {
    fn from(err: crate::error::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::response::IntoResponse;

    use super::*;

    #[test]
    fn test_text_too_long_maps_to_bad_request() {
        let resp = ApiError::TextTooLong("too long".to_string()).into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let resp = ApiError::Unauthorized.into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_rate_limited_maps_to_429() {
        let resp = ApiError::RateLimited.into_response();
        assert_eq!(resp.status(), axum::http::StatusCode::TOO_MANY_REQUESTS);
    }
}
