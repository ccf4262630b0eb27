//! Case record data model.
//!
//! A `CaseRecord` is the unit of investigation evidence persisted per run:
//! investigator identity, case number, a single build-time timestamp, the
//! subject IP, and the three evidence slots (registration, reverse DNS,
//! geolocation). Records are immutable once built; renderers and the audit
//! store only ever borrow them.
//!
//! Evidence slots use `Evidence<T>` rather than `Option<T>` so the
//! "adapter had no answer" state survives serialization as an explicit
//! `null` and cannot be confused with a struct whose fields are all absent.

use serde::{Deserialize, Serialize};

use crate::errors::{IpDossierError, Result};

/// Timestamp format shared by the record builder and the report footer.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Outcome of one evidence adapter: either a normalized value or a
/// distinguished "no evidence" marker carrying no diagnostic.
///
/// Serialized untagged: `Present(T)` is the bare value, `Unavailable` is
/// JSON `null`. Deserialization of `null` therefore round-trips back to
/// `Unavailable`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Evidence<T> {
    Present(T),
    Unavailable,
}

impl<T> Evidence<T> {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Evidence::Unavailable)
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Evidence::Present(v) => Some(v),
            Evidence::Unavailable => None,
        }
    }

    pub fn from_option(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Evidence::Present(v),
            None => Evidence::Unavailable,
        }
    }
}

/// Network registration / ownership metadata for an IP block.
///
/// Every field is optional: RDAP/WHOIS sources routinely omit any of them,
/// and an absent field must stay absent (never coerced to `""` or `0`) so
/// downstream rendering is not corrupted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RegistrationInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub asn_description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registrar: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl RegistrationInfo {
    /// True if no field was extracted at all (treated as no evidence).
    pub fn is_empty(&self) -> bool {
        self.ip_address.is_none()
            && self.cidr.is_none()
            && self.asn.is_none()
            && self.asn_description.is_none()
            && self.country.is_none()
            && self.registrar.is_none()
            && self.registration_date.is_none()
            && self.last_updated.is_none()
    }
}

/// Approximate geographic location of an IP address.
///
/// Latitude/longitude are required whenever geolocation evidence is present
/// (the map renderers need them); the descriptive fields are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_iso_code: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,

    pub latitude: f64,
    pub longitude: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

/// One persisted investigation: metadata plus the three evidence slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub investigator: String,
    pub case_number: String,

    /// Assigned once at build time, never re-derived at render time.
    pub timestamp: String,

    pub ip_address: String,
    pub registration: Evidence<RegistrationInfo>,
    pub reverse_dns: Evidence<String>,
    pub geolocation: Evidence<GeoInfo>,
}

impl CaseRecord {
    /// Assemble a record from caller metadata and the three adapter outputs.
    ///
    /// Pure aggregation apart from the wall-clock timestamp. Requires the
    /// three string inputs to be non-empty; IP syntax is the outermost
    /// boundary's responsibility and is not re-validated here.
    pub fn build(
        investigator: &str,
        case_number: &str,
        ip_address: &str,
        registration: Evidence<RegistrationInfo>,
        reverse_dns: Evidence<String>,
        geolocation: Evidence<GeoInfo>,
    ) -> Result<Self> {
        Self::validate_inputs(investigator, case_number, ip_address)?;

        Ok(Self {
            investigator: investigator.to_string(),
            case_number: case_number.to_string(),
            timestamp: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            ip_address: ip_address.to_string(),
            registration,
            reverse_dns,
            geolocation,
        })
    }

    /// Non-empty checks shared by the builder and the pipeline boundary,
    /// where they run before any network call is made.
    pub fn validate_inputs(investigator: &str, case_number: &str, ip_address: &str) -> Result<()> {
        require_non_empty("investigator", investigator)?;
        require_non_empty("case_number", case_number)?;
        require_non_empty("ip_address", ip_address)?;
        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IpDossierError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_geo() -> GeoInfo {
        GeoInfo {
            country_iso_code: Some("US".into()),
            country_name: Some("United States".into()),
            city_name: Some("Mountain View".into()),
            postal_code: None,
            latitude: 37.4,
            longitude: -122.1,
            time_zone: Some("America/Los_Angeles".into()),
        }
    }

    #[test]
    fn build_requires_non_empty_inputs() {
        let err = CaseRecord::build(
            "",
            "C-1001",
            "8.8.8.8",
            Evidence::Unavailable,
            Evidence::Unavailable,
            Evidence::Unavailable,
        )
        .unwrap_err();
        assert!(err.to_string().contains("investigator"));

        let err = CaseRecord::build(
            "J. Doe",
            "   ",
            "8.8.8.8",
            Evidence::Unavailable,
            Evidence::Unavailable,
            Evidence::Unavailable,
        )
        .unwrap_err();
        assert!(err.to_string().contains("case_number"));
    }

    #[test]
    fn timestamp_has_expected_shape() {
        let rec = CaseRecord::build(
            "J. Doe",
            "C-1001",
            "8.8.8.8",
            Evidence::Unavailable,
            Evidence::Unavailable,
            Evidence::Unavailable,
        )
        .unwrap();
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(rec.timestamp.len(), 19);
        assert_eq!(&rec.timestamp[4..5], "-");
        assert_eq!(&rec.timestamp[10..11], " ");
        assert_eq!(&rec.timestamp[13..14], ":");
    }

    #[test]
    fn evidence_slots_are_independent() {
        let rec = CaseRecord::build(
            "J. Doe",
            "C-1001",
            "8.8.8.8",
            Evidence::Unavailable,
            Evidence::Present("dns.google.".into()),
            Evidence::Present(sample_geo()),
        )
        .unwrap();
        assert!(rec.registration.is_unavailable());
        assert_eq!(rec.reverse_dns.as_present().unwrap(), "dns.google.");
        assert_eq!(rec.geolocation.as_present().unwrap().latitude, 37.4);
    }

    #[test]
    fn unavailable_serializes_as_null() {
        let ev: Evidence<String> = Evidence::Unavailable;
        assert_eq!(serde_json::to_string(&ev).unwrap(), "null");

        let back: Evidence<String> = serde_json::from_str("null").unwrap();
        assert!(back.is_unavailable());

        let present: Evidence<String> = serde_json::from_str("\"dns.google.\"").unwrap();
        assert_eq!(present.as_present().unwrap(), "dns.google.");
    }

    #[test]
    fn registration_omits_absent_fields() {
        let reg = RegistrationInfo {
            asn: Some("15169".into()),
            ..Default::default()
        };
        let json = serde_json::to_string(&reg).unwrap();
        assert_eq!(json, r#"{"asn":"15169"}"#);
        assert!(!json.contains("registrar"));

        let back: RegistrationInfo = serde_json::from_str(&json).unwrap();
        assert_eq!(back.asn.as_deref(), Some("15169"));
        assert!(back.registrar.is_none());
    }

    #[test]
    fn record_round_trips_through_json() {
        let rec = CaseRecord::build(
            "J. Doe",
            "C-1001",
            "8.8.8.8",
            Evidence::Present(RegistrationInfo {
                asn: Some("15169".into()),
                asn_description: Some("GOOGLE, US".into()),
                ..Default::default()
            }),
            Evidence::Present("dns.google.".into()),
            Evidence::Present(sample_geo()),
        )
        .unwrap();

        let json = serde_json::to_string(&rec).unwrap();
        let back: CaseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rec);
    }
}
