//! HTTP request handlers for the URL shortener API
//!
//! This module maps requests onto the registry and its results back onto HTTP:
//! - Creating short URLs with custom or random shortcodes
//! - Redirecting short URLs to their original destinations, recording the click
//! - Reporting click statistics for a shortcode
//!
//! Every significant event is logged with a `package` field (`handler` or `service`).

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension, Json,
};
use tracing::{error, info, warn};

use crate::client_ip::ClientAddr;
use crate::error::ShortenerError;
use crate::geo;
use crate::model::{ClickInput, CreateRequest, CreateResponse, MessageResponse, StatsResponse};
use crate::state::AppState;
use crate::validation::{validate_shortcode, validate_url, validate_validity};

/// JSON error body with the given status
fn failure(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(MessageResponse::failure(message))).into_response()
}

/// Creates a new short URL
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/very/long/url",
///   "validity": 30,          // Optional, minutes
///   "shortcode": "abc123"    // Optional
/// }
/// ```
///
/// # Response
///
/// - **201 Created** - URL successfully created
/// - **400 Bad Request** - Invalid body, URL, validity or shortcode
/// - **409 Conflict** - Shortcode already exists
pub async fn create_short_url(
    State(state): State<AppState>,
    payload: Result<Json<CreateRequest>, JsonRejection>,
) -> Response {
    info!(package = "handler", "URL shorten request received");

    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(package = "handler", "Invalid request body: {}", rejection.body_text());
            return failure(StatusCode::BAD_REQUEST, "Request body must be valid JSON");
        }
    };

    let validated = validate_url(payload.url.as_ref()).and_then(|url| {
        let validity = validate_validity(payload.validity.as_ref())?;
        let shortcode = validate_shortcode(payload.shortcode.as_ref())?;
        Ok((url, validity, shortcode))
    });

    let (url, validity, shortcode) = match validated {
        Ok(values) => values,
        Err(e) => {
            warn!(package = "handler", "Invalid input: {}", e);
            return failure(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    match state
        .registry
        .create(&url, shortcode.as_deref(), Some(validity))
    {
        Ok(record) => {
            info!(package = "service", "URL shortened: {}", record.shortcode);

            let response = CreateResponse {
                success: true,
                short_link: state.config.short_link(&record.shortcode),
                expiry: record.expires_at,
                message: "Short URL created successfully",
            };

            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(ShortenerError::DuplicateShortcode(shortcode)) => {
            warn!(package = "service", "Shortcode collision: {}", shortcode);
            failure(
                StatusCode::CONFLICT,
                "This shortcode is already taken, please try a different one",
            )
        }
        Err(e) => {
            error!(package = "handler", "URL shortening failed: {}", e);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong while creating your short URL",
            )
        }
    }
}

/// Returns click statistics for a shortcode
///
/// Expired shortcodes are still reported (with `isActive: false`).
///
/// # Response
///
/// - **200 OK** - Statistics snapshot
/// - **404 Not Found** - Shortcode was never created
pub async fn get_stats(Path(shortcode): Path<String>, State(state): State<AppState>) -> Response {
    info!(package = "handler", "Stats for: {}", shortcode);

    match state.registry.stats_snapshot(&shortcode) {
        Ok(stats) => {
            info!(package = "service", "Stats retrieved: {}", shortcode);
            Json(StatsResponse {
                success: true,
                data: stats.into(),
            })
            .into_response()
        }
        Err(_) => {
            warn!(package = "handler", "Shortcode not found: {}", shortcode);
            failure(StatusCode::NOT_FOUND, "Short URL not found")
        }
    }
}

/// Redirects a short URL to its original destination
///
/// On success the click is recorded with the referrer, user agent, client address and
/// its approximate location, then a **302 Found** is returned. Unknown and expired
/// shortcodes both answer **404 Not Found**.
pub async fn redirect_url(
    Path(shortcode): Path<String>,
    State(state): State<AppState>,
    Extension(ClientAddr(ip)): Extension<ClientAddr>,
    headers: HeaderMap,
) -> Response {
    info!(package = "handler", "Redirect: {}", shortcode);

    let record = match state.registry.resolve(&shortcode) {
        Ok(record) => record,
        Err(_) => {
            warn!(package = "handler", "Not found: {}", shortcode);
            return failure(
                StatusCode::NOT_FOUND,
                "This link has expired or does not exist",
            );
        }
    };

    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(String::from)
    };

    let location = geo::locate(state.geo.as_ref(), &ip);
    state.registry.record_click(
        &shortcode,
        ClickInput {
            referrer: header_value(header::REFERER),
            user_agent: header_value(header::USER_AGENT),
            ip: Some(ip),
            location: Some(location),
        },
    );

    info!(package = "service", "Redirected: {}", shortcode);

    (StatusCode::FOUND, [(header::LOCATION, record.original_url)]).into_response()
}

/// Fallback for unmatched routes
pub async fn not_found(uri: Uri) -> Response {
    warn!(package = "handler", "404: {}", uri.path());
    failure(StatusCode::NOT_FOUND, "Page not found")
}
