//! Shortcode registry
//!
//! Owns the mapping from shortcode to [`UrlRecord`] and the click logs hanging off it.
//! Records are never removed or replaced: an expired shortcode stays registered (and
//! reserved) for the lifetime of the process so its statistics remain inspectable.
//!
//! Creation performs the "is this shortcode taken" check and the insert under the same
//! entry lock, so two concurrent creates with the same custom shortcode cannot both
//! succeed. Readers never observe a partially built record.

use std::sync::Arc;

use chrono::Duration;
use dashmap::mapref::entry::{Entry, VacantEntry};
use dashmap::DashMap;
use uuid::Uuid;

use crate::clock::{Clock, SystemClock};
use crate::codegen::{random_code, MAX_ATTEMPTS};
use crate::error::{Result, ShortenerError};
use crate::model::{ClickEvent, ClickInput, Stats, UrlRecord};
use crate::recorder::ClickRecorder;

/// Validity applied when the caller does not give one
pub const DEFAULT_VALIDITY_MINUTES: u32 = 30;

/// In-memory shortcode registry
pub struct Registry {
    records: DashMap<String, UrlRecord>,
    recorder: ClickRecorder,
    clock: Arc<dyn Clock>,
    generate: fn() -> String,
}

impl Registry {
    /// Creates an empty registry driven by the given clock
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            recorder: ClickRecorder::new(Arc::clone(&clock)),
            clock,
            generate: random_code,
        }
    }

    /// Replaces the random shortcode generator
    pub fn with_code_generator(mut self, generate: fn() -> String) -> Self {
        self.generate = generate;
        self
    }

    /// Registers `original_url` under a custom or generated shortcode
    ///
    /// `original_url` and `custom_shortcode` are expected to be validated already; only
    /// uniqueness is checked here.
    ///
    /// # Errors
    ///
    /// * [`ShortenerError::DuplicateShortcode`] - the custom shortcode was ever registered
    /// * [`ShortenerError::ExhaustedCodespace`] - no free random code within the retry budget
    pub fn create(
        &self,
        original_url: &str,
        custom_shortcode: Option<&str>,
        validity_minutes: Option<u32>,
    ) -> Result<UrlRecord> {
        let validity_minutes = validity_minutes.unwrap_or(DEFAULT_VALIDITY_MINUTES);

        if let Some(shortcode) = custom_shortcode {
            return match self.records.entry(shortcode.to_string()) {
                Entry::Occupied(_) => Err(ShortenerError::DuplicateShortcode(shortcode.to_string())),
                Entry::Vacant(slot) => Ok(self.insert(slot, original_url, validity_minutes)),
            };
        }

        for _ in 0..MAX_ATTEMPTS {
            if let Entry::Vacant(slot) = self.records.entry((self.generate)()) {
                return Ok(self.insert(slot, original_url, validity_minutes));
            }
        }

        Err(ShortenerError::ExhaustedCodespace(MAX_ATTEMPTS))
    }

    fn insert(
        &self,
        slot: VacantEntry<'_, String, UrlRecord>,
        original_url: &str,
        validity_minutes: u32,
    ) -> UrlRecord {
        let created_at = self.clock.now();
        let record = UrlRecord {
            id: Uuid::new_v4(),
            original_url: original_url.to_string(),
            shortcode: slot.key().clone(),
            created_at,
            expires_at: created_at + Duration::minutes(i64::from(validity_minutes)),
            validity_minutes,
            is_active: true,
        };

        // log exists before the record becomes visible
        self.recorder.open(&record.shortcode);
        slot.insert(record.clone());

        record
    }

    /// Looks up a shortcode for redirection
    ///
    /// An expired record is reported as [`ShortenerError::NotFound`] and its cached
    /// `is_active` flag is cleared. The flag is never set back.
    pub fn resolve(&self, shortcode: &str) -> Result<UrlRecord> {
        let not_found = || ShortenerError::NotFound(shortcode.to_string());
        let record = self
            .records
            .get(shortcode)
            .map(|record| record.value().clone())
            .ok_or_else(not_found)?;

        if !record.is_live_at(self.clock.now()) {
            // the read guard is gone; only expired lookups take the write lock
            if let Some(mut expired) = self.records.get_mut(shortcode) {
                expired.is_active = false;
            }
            return Err(not_found());
        }

        Ok(record)
    }

    /// Statistics for any shortcode ever created, expired ones included
    pub fn stats_snapshot(&self, shortcode: &str) -> Result<Stats> {
        let record = self
            .records
            .get(shortcode)
            .map(|record| record.value().clone())
            .ok_or_else(|| ShortenerError::NotFound(shortcode.to_string()))?;

        let clicks = self.recorder.log(shortcode);

        Ok(Stats {
            is_active: record.is_live_at(self.clock.now()),
            shortcode: record.shortcode,
            original_url: record.original_url,
            created_at: record.created_at,
            expires_at: record.expires_at,
            total_clicks: clicks.len(),
            clicks,
        })
    }

    /// Records a click on a shortcode that was just resolved
    pub fn record_click(&self, shortcode: &str, input: ClickInput) -> ClickEvent {
        self.recorder.record(shortcode, input)
    }

    /// The click logs of every shortcode
    pub fn recorder(&self) -> &ClickRecorder {
        &self.recorder
    }

    /// Number of shortcodes ever registered
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no shortcode was ever registered
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}
