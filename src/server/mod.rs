//! The HTTP surface: an `axum` router exposing the pipeline, cache, and
//! ambient collaborators (`config`, `chunker`, optional encryption and rate
//! limiting) over a small REST API.

pub mod auth;
#[cfg(feature = "encryption")]
pub mod encryption;
pub mod error;
#[cfg(feature = "rate-limit")]
pub mod rate_limit;
pub mod routes;
pub mod state;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

/// Build the complete router for a given [`state::AppState`].
///
/// `/health` and `/languages` are reachable without an API key; everything
/// under `/api/v1` is gated by [`auth::require_api_key`] and, if configured,
/// [`routes::enforce_rate_limit`].
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let mut api = Router::new()
        .route("/check", post(routes::check))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ));

    #[cfg(feature = "rate-limit")]
    {
        api = api.route_layer(middleware::from_fn_with_state(
            state.clone(),
            routes::enforce_rate_limit,
        ));
    }

    #[cfg(feature = "encryption")]
    {
        api = api.route("/public-key", get(routes::public_key));
    }

    Router::new()
        .route("/health", get(routes::health))
        .route("/languages", get(routes::supported_languages))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origins: &str) -> CorsLayer {
    if origins.trim() == "*" {
        CorsLayer::permissive()
    } else {
        let parsed: Vec<axum::http::HeaderValue> = origins
            .split(',')
            .filter_map(|o| o.trim().parse().ok())
            .collect();
        CorsLayer::new().allow_origin(parsed)
    }
}
