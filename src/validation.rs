//! Input validation for the HTTP API
//!
//! The registry trusts its inputs; everything a client sends is checked here first.

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::registry::DEFAULT_VALIDITY_MINUTES;

pub const MAX_URL_LENGTH: usize = 2048;

/// One year
pub const MAX_VALIDITY_MINUTES: u32 = 525_600;

pub const MIN_SHORTCODE_LENGTH: usize = 3;
pub const MAX_SHORTCODE_LENGTH: usize = 10;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("URL is required and must be a string")]
    MissingUrl,

    #[error("Invalid URL format")]
    InvalidUrl,

    #[error("URL too long (max 2048 characters)")]
    UrlTooLong,

    #[error("Validity must be a positive integer")]
    InvalidValidity,

    #[error("Validity cannot exceed 1 year (525600 minutes)")]
    ValidityTooLong,

    #[error("Shortcode must be a string")]
    ShortcodeNotString,

    #[error("Shortcode must be 3-10 characters long")]
    ShortcodeLength,

    #[error("Shortcode must contain only alphanumeric characters")]
    ShortcodeCharacters,
}

/// Checks that `value` is an absolute http(s) URL of at most 2048 characters
pub fn validate_url(value: Option<&Value>) -> Result<String, ValidationError> {
    let url = match value {
        Some(Value::String(url)) if !url.is_empty() => url,
        _ => return Err(ValidationError::MissingUrl),
    };

    let parsed = Url::parse(url).map_err(|_| ValidationError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https" | "ftp") || parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl);
    }

    if url.len() > MAX_URL_LENGTH {
        return Err(ValidationError::UrlTooLong);
    }

    Ok(url.clone())
}

/// Validity in minutes, 30 when absent
///
/// Any integral JSON number is accepted, so `30.0` counts as 30 minutes.
pub fn validate_validity(value: Option<&Value>) -> Result<u32, ValidationError> {
    let minutes = match value {
        None | Some(Value::Null) => return Ok(DEFAULT_VALIDITY_MINUTES),
        Some(Value::Number(number)) => number.as_f64().ok_or(ValidationError::InvalidValidity)?,
        Some(_) => return Err(ValidationError::InvalidValidity),
    };

    if minutes.fract() != 0.0 || minutes <= 0.0 {
        return Err(ValidationError::InvalidValidity);
    }

    if minutes > f64::from(MAX_VALIDITY_MINUTES) {
        return Err(ValidationError::ValidityTooLong);
    }

    Ok(minutes as u32)
}

/// Optional custom shortcode
///
/// Empty strings, `0` and `false` count as absent, like a missing field.
pub fn validate_shortcode(value: Option<&Value>) -> Result<Option<String>, ValidationError> {
    let code = match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => return Ok(None),
        Some(Value::Number(number)) if number.as_f64() == Some(0.0) => return Ok(None),
        Some(Value::String(code)) if code.is_empty() => return Ok(None),
        Some(Value::String(code)) => code,
        Some(_) => return Err(ValidationError::ShortcodeNotString),
    };

    let length = code.chars().count();
    if !(MIN_SHORTCODE_LENGTH..=MAX_SHORTCODE_LENGTH).contains(&length) {
        return Err(ValidationError::ShortcodeLength);
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ValidationError::ShortcodeCharacters);
    }

    Ok(Some(code.clone()))
}

/// Whether `code` has the shape of a shortcode: 3-10 ASCII letters or digits
pub fn is_valid_shortcode(code: &str) -> bool {
    (MIN_SHORTCODE_LENGTH..=MAX_SHORTCODE_LENGTH).contains(&code.len())
        && code.chars().all(|c| c.is_ascii_alphanumeric())
}
