//! Approximate client location
//!
//! Lookups go through [`GeoLookup`] so the service can run with a local MaxMind
//! GeoLite2-City database or with no database at all. The resulting string is opaque
//! to the registry.

use std::net::IpAddr;

use maxminddb::Reader;
use tracing::{info, trace, warn};

/// Location for loopback and private addresses
pub const LOCAL: &str = "local";

/// Location when nothing could be determined
pub const UNKNOWN: &str = "unknown";

/// Location information for an address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 country code (e.g., "ID", "US")
    pub country: Option<String>,
    pub city: Option<String>,
}

/// GeoIP lookup interface
pub trait GeoLookup: Send + Sync {
    fn lookup(&self, ip: IpAddr) -> Option<GeoInfo>;

    /// Provider name, for logs
    fn name(&self) -> &'static str;
}

/// Local MaxMind database
pub struct MaxMindLookup {
    reader: Reader<Vec<u8>>,
}

impl MaxMindLookup {
    pub fn open(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        Ok(Self {
            reader: Reader::open_readfile(path)?,
        })
    }
}

impl GeoLookup for MaxMindLookup {
    fn lookup(&self, ip: IpAddr) -> Option<GeoInfo> {
        let result = self.reader.lookup(ip).ok()?;
        let city: maxminddb::geoip2::City = result.decode().ok()??;

        let country = city.country.iso_code.map(String::from);
        let city_name = city.city.names.english.map(|s| s.to_string());

        trace!("MaxMind lookup for {}: country={:?}, city={:?}", ip, country, city_name);

        Some(GeoInfo {
            country,
            city: city_name,
        })
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}

/// Used when no database is configured; every public address is unknown
pub struct NoopLookup;

impl GeoLookup for NoopLookup {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoInfo> {
        None
    }

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Picks the MaxMind database at `path` if it opens, falling back to [`NoopLookup`]
pub fn provider(path: Option<&str>) -> Box<dyn GeoLookup> {
    let lookup: Box<dyn GeoLookup> = match path {
        Some(path) => match MaxMindLookup::open(path) {
            Ok(lookup) => Box::new(lookup),
            Err(e) => {
                warn!("GeoIP: failed to load MaxMind database at {}: {}", path, e);
                Box::new(NoopLookup)
            }
        },
        None => Box::new(NoopLookup),
    };

    info!("GeoIP: using {} provider", lookup.name());
    lookup
}

/// Whether `ip` is loopback or in a private range
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => v4.is_private() || v4.is_loopback(),
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || (v6.segments()[0] & 0xfe00) == 0xfc00 // fc00::/7
                || (v6.segments()[0] & 0xffc0) == 0xfe80 // fe80::/10
        }
    }
}

/// Human readable location for a client address
///
/// * empty or `"unknown"` address, loopback or private range: `"local"`
/// * unparseable address or lookup miss: `"unknown"`
/// * otherwise `"{city}, {country}"`, either half may be `"Unknown"`
pub fn locate(lookup: &dyn GeoLookup, ip: &str) -> String {
    let ip = ip.trim();
    if ip.is_empty() || ip == UNKNOWN {
        return LOCAL.to_string();
    }

    let Ok(addr) = ip.parse::<IpAddr>() else {
        return UNKNOWN.to_string();
    };
    let addr = addr.to_canonical();

    if is_private_or_local(&addr) {
        return LOCAL.to_string();
    }

    match lookup.lookup(addr) {
        Some(GeoInfo { country: None, city: None }) | None => UNKNOWN.to_string(),
        Some(info) => format!(
            "{}, {}",
            info.city.as_deref().unwrap_or("Unknown"),
            info.country.as_deref().unwrap_or("Unknown"),
        ),
    }
}
