//! Geographic classification of client IP addresses.
//!
//! Classification is synchronous and never performs I/O on the request path.
//! Private and loopback addresses are labelled `Local`; anything a
//! [`GeoLookup`] cannot resolve is labelled `Unknown`.

use maxminddb::{MaxMindDBError, Reader, geoip2};
use std::net::IpAddr;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

pub const LOCAL: &str = "Local";
pub const UNKNOWN: &str = "Unknown";

/// Country and city resolved for an IP address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoLocation {
    pub country: String,
    pub city: String,
}

impl GeoLocation {
    pub fn new(country: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            city: city.into(),
        }
    }

    pub fn local() -> Self {
        Self::new(LOCAL, LOCAL)
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, UNKNOWN)
    }
}

/// A synchronous, in-process IP geolocation source.
pub trait GeoLookup: Send + Sync {
    /// Resolves a public address, or returns `None` if it is not covered.
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation>;
}

impl<F> GeoLookup for F
where
    F: Fn(IpAddr) -> Option<GeoLocation> + Send + Sync,
{
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation> {
        self(ip)
    }
}

/// Lookup used when no geolocation database is configured.
///
/// Every public address classifies as `Unknown`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeoDatabase;

impl GeoLookup for NoGeoDatabase {
    fn lookup(&self, _ip: IpAddr) -> Option<GeoLocation> {
        None
    }
}

/// Lookup backed by a MaxMind city database (`GeoLite2-City.mmdb` or
/// compatible), loaded fully into memory.
///
/// Country is reported as the ISO code, city as its English name.
pub struct MaxMindGeo {
    reader: Reader<Vec<u8>>,
}

impl MaxMindGeo {
    /// Reads the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MaxMindDBError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self { reader })
    }
}

impl GeoLookup for MaxMindGeo {
    fn lookup(&self, ip: IpAddr) -> Option<GeoLocation> {
        let record: geoip2::City = self.reader.lookup(ip).ok()?;

        let country = record
            .country
            .and_then(|country| country.iso_code)
            .unwrap_or(UNKNOWN);
        let city = record
            .city
            .and_then(|city| city.names)
            .and_then(|names| names.get("en").copied())
            .unwrap_or(UNKNOWN);

        Some(GeoLocation::new(country, city))
    }
}

/// Builds the lookup for the configured database path.
///
/// A missing or unreadable database is logged and replaced by
/// [`NoGeoDatabase`]; clicks are still recorded, just without a location.
pub fn open_geo_database(path: Option<&str>) -> Arc<dyn GeoLookup> {
    let Some(path) = path else {
        info!("GeoIP disabled (no GEOIP_DB_PATH)");
        return Arc::new(NoGeoDatabase);
    };

    match MaxMindGeo::open(path) {
        Ok(geo) => {
            info!(path, "GeoIP database loaded");
            Arc::new(geo)
        }
        Err(e) => {
            warn!(path, error = %e, "Failed to load GeoIP database, locations will be Unknown");
            Arc::new(NoGeoDatabase)
        }
    }
}

/// Classifies `ip` into a country/city pair.
///
/// Missing fields in a lookup result are normalized to `Unknown`.
pub fn classify_ip(ip: &str, geo: &dyn GeoLookup) -> GeoLocation {
    // Strip IPv6-mapped IPv4 prefix: "::ffff:1.2.3.4" → "1.2.3.4"
    let ip = ip.trim();
    let ip = ip.strip_prefix("::ffff:").unwrap_or(ip);

    let Ok(addr) = IpAddr::from_str(ip) else {
        return GeoLocation::unknown();
    };

    if is_private(&addr) {
        return GeoLocation::local();
    }

    match geo.lookup(addr) {
        Some(found) => GeoLocation {
            country: non_empty_or_unknown(found.country),
            city: non_empty_or_unknown(found.city),
        },
        None => GeoLocation::unknown(),
    }
}

fn non_empty_or_unknown(value: String) -> String {
    if value.trim().is_empty() {
        UNKNOWN.to_string()
    } else {
        value
    }
}

/// Returns `true` for loopback, link-local, private and unspecified ranges.
fn is_private(addr: &IpAddr) -> bool {
    match addr {
        IpAddr::V4(addr) => {
            let octets = addr.octets();
            addr.is_loopback()          // 127.x.x.x
            || addr.is_link_local()     // 169.254.x.x
            || addr.is_unspecified()    // 0.0.0.0
            || octets[0] == 10
            || (octets[0] == 172 && (16..=31).contains(&octets[1]))
            || (octets[0] == 192 && octets[1] == 168)
        }
        IpAddr::V6(addr) => {
            addr.is_loopback()       // ::1
            || addr.is_unspecified() // ::
            // fe80::/10  link-local
            || (addr.segments()[0] & 0xffc0) == 0xfe80
            // fc00::/7   unique-local
            || (addr.segments()[0] & 0xfe00) == 0xfc00
        }
    }
}
