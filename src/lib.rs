//! In-memory URL shortener with per-click analytics
//!
//! The [`registry`] owns shortcodes and their expiry, the [`recorder`] owns click logs.
//! Everything else is the HTTP service around them.

pub mod client_ip;
pub mod clock;
pub mod codegen;
pub mod config;
pub mod error;
pub mod geo;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod recorder;
pub mod registry;
pub mod route;
pub mod state;
pub mod validation;
