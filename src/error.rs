//! Error taxonomy of the shortcode registry
//!
//! These are the only failures the core surfaces to its callers. Mapping them to a
//! transport representation (status codes, JSON bodies) is done by the handlers.

use thiserror::Error;

/// Failures returned by [`Registry`](crate::registry::Registry) operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShortenerError {
    /// The requested custom shortcode is already registered (live or expired)
    #[error("Shortcode already exists: {0}")]
    DuplicateShortcode(String),

    /// Random generation could not find a free code within the retry budget
    #[error("No free shortcode found after {0} attempts")]
    ExhaustedCodespace(usize),

    /// The shortcode was never created, or (for resolve) has expired
    #[error("Shortcode not found: {0}")]
    NotFound(String),
}

/// Result type for all registry interactions
pub type Result<T> = std::result::Result<T, ShortenerError>;
