//! Data models for the URL shortener
//!
//! This module defines the records owned by the registry and click recorder, plus the
//! request/response bodies of the HTTP API. JSON field names are camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A registered short URL
///
/// Every field except `is_active` is immutable after creation. `is_active` is only a
/// cached display flag; liveness decisions go through [`UrlRecord::is_live_at`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlRecord {
    /// Opaque unique identifier assigned at creation
    pub id: Uuid,

    /// The long URL the shortcode redirects to
    pub original_url: String,

    /// Registry key, 3-10 alphanumeric characters
    pub shortcode: String,

    pub created_at: DateTime<Utc>,

    /// `created_at + validity_minutes`
    #[serde(rename = "expiry")]
    pub expires_at: DateTime<Utc>,

    pub validity_minutes: u32,

    /// Last liveness observed by a redirect lookup
    pub is_active: bool,
}

impl UrlRecord {
    /// Whether the record is within its validity window at `now`
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        now <= self.expires_at
    }
}

/// One recorded visit to a shortcode
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    /// Assigned by the recorder, never by the caller
    pub timestamp: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: String,
    pub ip: String,
    pub location: String,
}

/// Caller-supplied click details, all optional
///
/// Missing fields are filled in by the recorder (`"direct"` for the referrer,
/// `"unknown"` for everything else).
#[derive(Debug, Clone, Default)]
pub struct ClickInput {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub location: Option<String>,
}

/// Point-in-time statistics for a shortcode
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub shortcode: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "expiry")]
    pub expires_at: DateTime<Utc>,
    pub total_clicks: usize,

    /// Recomputed from the clock on every snapshot
    pub is_active: bool,

    /// Full click log in insertion order
    pub clicks: Vec<ClickEvent>,
}

/// Request payload for creating a new short URL
///
/// Fields are kept as raw JSON values so type mismatches surface as validation
/// messages instead of extractor rejections.
///
/// # Example
/// ```json
/// {
///   "url": "https://example.com/very/long/url",
///   "validity": 30,
///   "shortcode": "abc123"
/// }
/// ```
#[derive(Deserialize, Debug, Default)]
pub struct CreateRequest {
    pub url: Option<Value>,

    /// Minutes until expiry, defaults to 30
    pub validity: Option<Value>,

    /// Optional custom shortcode, a random one is generated otherwise
    pub shortcode: Option<Value>,
}

/// Response returned after successfully creating a short URL
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResponse {
    pub success: bool,
    pub short_link: String,
    pub expiry: DateTime<Utc>,
    pub message: &'static str,
}

/// Click as exposed by the statistics endpoint (the client address stays private)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickDetail {
    pub timestamp: DateTime<Utc>,
    pub referrer: String,
    pub location: String,
    pub user_agent: String,
}

impl From<ClickEvent> for ClickDetail {
    fn from(click: ClickEvent) -> Self {
        Self {
            timestamp: click.timestamp,
            referrer: click.referrer,
            location: click.location,
            user_agent: click.user_agent,
        }
    }
}

/// Statistics body of `GET /shorturls/{shortcode}`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub shortcode: String,
    pub original_url: String,
    pub created_at: DateTime<Utc>,
    pub expiry: DateTime<Utc>,
    pub total_clicks: usize,
    pub is_active: bool,
    pub click_details: Vec<ClickDetail>,
}

impl From<Stats> for StatsData {
    fn from(stats: Stats) -> Self {
        Self {
            shortcode: stats.shortcode,
            original_url: stats.original_url,
            created_at: stats.created_at,
            expiry: stats.expires_at,
            total_clicks: stats.total_clicks,
            is_active: stats.is_active,
            click_details: stats.clicks.into_iter().map(ClickDetail::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsData,
}

/// Body of every error response
#[derive(Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

impl MessageResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
