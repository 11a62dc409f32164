//! Application state shared across all request handlers

use std::sync::Arc;

use crate::config::Config;
use crate::geo::{self, GeoLookup, NoopLookup};
use crate::registry::Registry;

/// Owning service object, built once at startup and cloned into every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub geo: Arc<dyn GeoLookup>,
    pub config: Arc<Config>,
}

impl AppState {
    /// State for the running service: wall clock, GeoIP provider from the config
    pub fn from_config(config: Config) -> Self {
        let geo: Arc<dyn GeoLookup> = Arc::from(geo::provider(config.geoip_db.as_deref()));

        Self {
            registry: Arc::new(Registry::default()),
            geo,
            config: Arc::new(config),
        }
    }

    /// State around an existing registry, without geolocation
    pub fn with_registry(registry: Registry, config: Config) -> Self {
        Self {
            registry: Arc::new(registry),
            geo: Arc::new(NoopLookup),
            config: Arc::new(config),
        }
    }
}
