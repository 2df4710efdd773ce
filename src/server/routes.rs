//! `axum` handlers for the HTTP surface.

use std::net::SocketAddr;

use axum::{
    body::Bytes,
    extract::{ConnectInfo, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{
    core::{CheckRequest, CheckResponse, Mode},
    languages,
};

use super::{error::ApiError, state::AppState};

#[cfg(feature = "encryption")]
use super::encryption::EncryptedPayload;

/// `Content-Type`/`Accept` value that marks a body as an [`EncryptedPayload`]
/// envelope rather than plain JSON.
const ENCRYPTED_CONTENT_TYPE: &str = "application/x-encrypted";

fn mode_key(mode: Mode) -> &'static str {
    match mode {
        Mode::Strict => "strict",
        Mode::Style => "style",
    }
}

fn header_names_encrypted(headers: &HeaderMap, name: axum::http::HeaderName) -> bool {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains(ENCRYPTED_CONTENT_TYPE))
}

/// `POST /api/v1/check` -- the main entry point. Validates the request,
/// consults the cache, chunks long documents, and drives the pipeline.
///
/// When `Content-Type: application/x-encrypted` is set, the body is decoded
/// as an [`EncryptedPayload`] envelope before anything else runs. When the
/// caller's `Accept` header requests the same content type, the response is
/// symmetrically re-encrypted. See §4.10.1 for the envelope scheme.
pub async fn check(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request_encrypted = header_names_encrypted(&headers, header::CONTENT_TYPE);
    let plaintext = decode_body(&state, request_encrypted, &body)?;

    let request: CheckRequest = serde_json::from_slice(&plaintext)
        .map_err(|e| ApiError::Internal(format!("invalid request body: {e}")))?;

    request
        .validate(state.config.max_text_length)
        .map_err(|e| match e {
            crate::error::Error::InvalidRequest(msg) if msg.starts_with("unsupported language") => {
                ApiError::UnsupportedLanguage(request.language.clone())
            },
            crate::error::Error::InvalidRequest(msg) => ApiError::TextTooLong(msg),
            other => ApiError::Internal(other.to_string()),
        })?;

    let mode = mode_key(request.mode);
    let response_encrypted = header_names_encrypted(&headers, header::ACCEPT);

    if let Some(cached) = state.cache.get(&request.text, &request.language, mode) {
        return encode_response(&state, response_encrypted, cached);
    }

    let chunks = state.chunker.chunk_text(&request.text);
    let response = if chunks.len() <= 1 {
        state.pipeline.process(&request).await
    } else {
        process_chunked(&state, &request, &chunks).await
    };

    state
        .cache
        .set(&request.text, &request.language, mode, response.clone());

    encode_response(&state, response_encrypted, response)
}

#[cfg(feature = "encryption")]
fn decode_body(state: &AppState, encrypted: bool, body: &[u8]) -> Result<Vec<u8>, ApiError> {
    if !encrypted {
        return Ok(body.to_vec());
    }
    let service = state
        .encryption
        .as_ref()
        .ok_or_else(|| ApiError::EncryptionFailure("encryption is not enabled".to_string()))?;
    let envelope: EncryptedPayload = serde_json::from_slice(body)
        .map_err(|e| ApiError::EncryptionFailure(e.to_string()))?;
    service
        .decrypt_payload(&envelope)
        .map_err(|e| ApiError::EncryptionFailure(e.to_string()))
}

#[cfg(not(feature = "encryption"))]
fn decode_body(_state: &AppState, encrypted: bool, body: &[u8]) -> Result<Vec<u8>, ApiError> {
    if encrypted {
        return Err(ApiError::Internal("encryption is not compiled in".to_string()));
    }
    Ok(body.to_vec())
}

#[cfg(feature = "encryption")]
fn encode_response(
    state: &AppState,
    encrypted: bool,
    response: CheckResponse,
) -> Result<Response, ApiError> {
    if !encrypted {
        return Ok(Json(response).into_response());
    }
    let service = state
        .encryption
        .as_ref()
        .ok_or_else(|| ApiError::EncryptionFailure("encryption is not enabled".to_string()))?;
    let plaintext =
        serde_json::to_vec(&response).map_err(|e| ApiError::Internal(e.to_string()))?;
    let envelope = service
        .encrypt_payload(&plaintext)
        .map_err(|e| ApiError::EncryptionFailure(e.to_string()))?;
    Ok((
        [(header::CONTENT_TYPE, ENCRYPTED_CONTENT_TYPE)],
        Json(envelope),
    )
        .into_response())
}

#[cfg(not(feature = "encryption"))]
fn encode_response(
    _state: &AppState,
    _encrypted: bool,
    response: CheckResponse,
) -> Result<Response, ApiError> {
    Ok(Json(response).into_response())
}

async fn process_chunked(
    state: &AppState,
    request: &CheckRequest,
    chunks: &[crate::chunker::TextChunk],
) -> CheckResponse {
    let mut corrected_parts = Vec::with_capacity(chunks.len());
    let mut all_issues = Vec::new();
    let mut all_rewrites = Vec::new();
    let mut all_explanations = Vec::new();
    let mut any_fallback = false;

    for chunk in chunks {
        let chunk_request = CheckRequest {
            text: chunk.text.clone(),
            ..request.clone()
        };
        let chunk_response = state.pipeline.process(&chunk_request).await;

        corrected_parts.push(crate::chunker::TextChunk {
            text: chunk_response.corrected_text.clone(),
            start_offset: chunk.start_offset,
            end_offset: chunk.end_offset,
            paragraph_index: chunk.paragraph_index,
        });

        any_fallback |= chunk_response.fallback_used;
        all_issues.extend(crate::chunker::Chunker::adjust_issue_offsets(
            chunk_response.issues,
            chunk,
        ));
        all_rewrites.extend(chunk_response.rewrites);
        all_explanations.extend(chunk_response.explanations);
    }

    let corrected_text = crate::chunker::Chunker::merge_chunks(&corrected_parts);
    let mut response = CheckResponse::new(
        request.text.clone(),
        corrected_text,
        all_issues,
        all_rewrites,
        all_explanations,
        true,
        any_fallback,
        request.language.clone(),
    );

    if !request.include_explanations {
        response.clear_explanations();
    }

    response
}

/// `GET /health` -- probes both backends and reports overall readiness.
pub async fn health(State(state): State<AppState>) -> Json<crate::pipeline::HealthStatus> {
    Json(state.pipeline.check_services().await)
}

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    languages: Vec<crate::languages::LanguageInfo>,
}

/// `GET /languages` -- lists every supported language.
pub async fn supported_languages() -> Json<LanguagesResponse> {
    Json(LanguagesResponse {
        languages: languages::all().to_vec(),
    })
}

/// `GET /api/v1/public-key` -- returns the server's RSA public key in PEM
/// form, for clients that want to use the encrypted envelope.
#[cfg(feature = "encryption")]
pub async fn public_key(State(state): State<AppState>) -> Result<String, ApiError> {
    let service = state
        .encryption
        .as_ref()
        .ok_or(ApiError::EncryptionFailure("encryption is not enabled".to_string()))?;
    service
        .public_key_pem()
        .map_err(|e| ApiError::EncryptionFailure(e.to_string()))
}

/// Rate-limiting middleware, applied ahead of the auth check so rejected
/// callers never reach backend-driving handlers.
#[cfg(feature = "rate-limit")]
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Result<axum::response::Response, ApiError> {
    if let Some(limiter) = state.rate_limiter.as_ref() {
        if !limiter.check(addr.ip()) {
            return Err(ApiError::RateLimited);
        }
    }
    Ok(next.run(req).await)
}
