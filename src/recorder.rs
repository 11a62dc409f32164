//! Click recorder
//!
//! Keeps one append-only click log per shortcode. Appends for the same shortcode are
//! serialized by the map's entry lock, so each log is a total order matching the order
//! in which `record` calls completed. Logs for different shortcodes never contend
//! unless they share a shard.

use std::sync::Arc;

use dashmap::DashMap;

use crate::clock::{Clock, SystemClock};
use crate::model::{ClickEvent, ClickInput};

const DIRECT: &str = "direct";
const UNKNOWN: &str = "unknown";

/// Per-shortcode ordered click logs
pub struct ClickRecorder {
    logs: DashMap<String, Vec<ClickEvent>>,
    clock: Arc<dyn Clock>,
}

impl ClickRecorder {
    /// Creates an empty recorder stamping clicks with `clock`
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            logs: DashMap::new(),
            clock,
        }
    }

    /// Appends one click to the log of `shortcode`
    ///
    /// Does not check that the shortcode exists or is live; callers resolve it first.
    /// An unknown shortcode simply starts a new log.
    pub fn record(&self, shortcode: &str, input: ClickInput) -> ClickEvent {
        let mut log = self.logs.entry(shortcode.to_string()).or_default();

        // stamped under the entry lock so timestamps never go backwards within a log
        let click = ClickEvent {
            timestamp: self.clock.now(),
            referrer: input.referrer.unwrap_or_else(|| DIRECT.to_string()),
            user_agent: input.user_agent.unwrap_or_else(|| UNKNOWN.to_string()),
            ip: input.ip.unwrap_or_else(|| UNKNOWN.to_string()),
            location: input.location.unwrap_or_else(|| UNKNOWN.to_string()),
        };

        log.push(click.clone());

        click
    }

    /// Starts an empty log for `shortcode` if none exists yet
    pub(crate) fn open(&self, shortcode: &str) {
        self.logs.entry(shortcode.to_string()).or_default();
    }

    /// Number of clicks recorded for `shortcode`
    pub fn count(&self, shortcode: &str) -> usize {
        self.logs.get(shortcode).map_or(0, |log| log.len())
    }

    /// Copy of the click log of `shortcode`, oldest first
    pub fn log(&self, shortcode: &str) -> Vec<ClickEvent> {
        self.logs
            .get(shortcode)
            .map(|log| log.value().clone())
            .unwrap_or_default()
    }
}

impl Default for ClickRecorder {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
