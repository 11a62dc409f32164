//! Route definitions for the URL shortener API
//!
//! This module configures all HTTP routes and maps them to their respective handlers.

use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::handler::{create_short_url, get_stats, not_found, redirect_url};
use crate::middleware::client_addr_middleware;
use crate::state::AppState;

/// Creates and configures the Axum application router with all routes
///
/// # Route Definitions
///
/// - `POST /shorturls` - Creates a new short URL
/// - `GET /shorturls/{shortcode}` - Click statistics for a shortcode
/// - `GET /{shortcode}` - Redirects to the original URL and records the click
///
/// Anything else answers `404 Not Found` with a JSON body.
pub fn create_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    let app = Router::new()
        .route("/shorturls", post(create_short_url))
        .route("/shorturls/{shortcode}", get(get_stats))
        .route("/{shortcode}", get(redirect_url))
        .fallback(not_found)
        .layer(middleware::from_fn(client_addr_middleware))
        .with_state(state);

    match cors {
        Some(cors) => app.layer(cors),
        None => app,
    }
}

fn cors_layer(origin: &str) -> Option<CorsLayer> {
    let origin = match HeaderValue::from_str(origin) {
        Ok(origin) => origin,
        Err(_) => {
            tracing::warn!(package = "config", "Ignoring invalid CORS origin: {}", origin);
            return None;
        }
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true),
    )
}
