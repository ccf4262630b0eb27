//! Geolocation evidence adapter (GeoLite2 City database).
//!
//! Reads a local MaxMind GeoLite2/GeoIP2 City database and normalizes the
//! nested record shape into `GeoInfo`. Unlike the other two adapters this
//! one surfaces failures as errors rather than masking them: an unreadable
//! database or an unmapped IP produces a descriptive `Lookup` error and
//! never silent partial data. The pipeline decides how to treat that (it
//! records the slot as unavailable and continues).

use std::net::IpAddr;
use std::path::Path;

use maxminddb::geoip2;

use crate::errors::{IpDossierError, Result};
use crate::record::GeoInfo;

const SOURCE: &str = "geolocation";

/// Look up city-level geolocation for `ip` in the database at `db_path`.
///
/// Latitude/longitude are required for a usable result (the map renderers
/// need them); a database entry without coordinates is treated as a miss.
pub fn lookup_geolocation(ip: IpAddr, db_path: &Path) -> Result<GeoInfo> {
    let reader = maxminddb::Reader::open_readfile(db_path).map_err(|e| {
        IpDossierError::lookup(
            SOURCE,
            ip.to_string(),
            format!("cannot open database {}: {}", db_path.display(), e),
        )
    })?;

    let city: geoip2::City = reader.lookup(ip).map_err(|e| match e {
        maxminddb::MaxMindDBError::AddressNotFoundError(_) => IpDossierError::lookup(
            SOURCE,
            ip.to_string(),
            format!("address not found in {}", db_path.display()),
        ),
        other => IpDossierError::lookup(
            SOURCE,
            ip.to_string(),
            format!("database read failed: {}", other),
        ),
    })?;

    let location = city.location.as_ref();
    let (latitude, longitude) = match (
        location.and_then(|l| l.latitude),
        location.and_then(|l| l.longitude),
    ) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => {
            return Err(IpDossierError::lookup(
                SOURCE,
                ip.to_string(),
                "database entry has no coordinates",
            ));
        }
    };

    Ok(GeoInfo {
        country_iso_code: city
            .country
            .as_ref()
            .and_then(|c| c.iso_code)
            .map(str::to_string),
        country_name: city
            .country
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|n| n.get("en"))
            .map(|s| s.to_string()),
        city_name: city
            .city
            .as_ref()
            .and_then(|c| c.names.as_ref())
            .and_then(|n| n.get("en"))
            .map(|s| s.to_string()),
        postal_code: city
            .postal
            .as_ref()
            .and_then(|p| p.code)
            .map(str::to_string),
        latitude,
        longitude,
        time_zone: location.and_then(|l| l.time_zone).map(str::to_string),
    })
}
