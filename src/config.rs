//! Service configuration
//!
//! Read from the environment once at startup (after loading a `.env` file if present).

use std::env;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Host advertised in short links
    pub host: String,

    pub port: u16,

    /// Interface the listener binds to
    pub bind_addr: String,

    /// Prefix of every short link, `http://{host}:{port}` unless `BASE_URL` is set
    pub base_url: String,

    /// Path to a MaxMind GeoLite2-City database
    pub geoip_db: Option<String>,

    /// Browser origin allowed to call the API
    pub cors_origin: String,
}

impl Config {
    /// Builds the configuration from environment variables
    ///
    /// - `HOST` (default: localhost)
    /// - `PORT` (default: 8000)
    /// - `BIND_ADDR` (default: 0.0.0.0)
    /// - `BASE_URL` (default: `http://{HOST}:{PORT}`)
    /// - `GEOIP_DB` (optional)
    /// - `CORS_ORIGIN` (default: http://localhost:3000)
    pub fn from_env() -> anyhow::Result<Self> {
        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(port) => port.parse()?,
            None => DEFAULT_PORT,
        };
        let base_url = var("BASE_URL").unwrap_or_else(|| format!("http://{}:{}", host, port));

        Ok(Self {
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            base_url: base_url.trim_end_matches('/').to_string(),
            geoip_db: var("GEOIP_DB"),
            cors_origin: var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string()),
            host,
            port,
        })
    }

    /// Full short link for `shortcode`
    pub fn short_link(&self, shortcode: &str) -> String {
        format!("{}/{}", self.base_url, shortcode)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            base_url: format!("http://{}:{}", DEFAULT_HOST, DEFAULT_PORT),
            geoip_db: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

/// Non-empty value of an environment variable
fn var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}
