//! Investigation pipeline facade.
//!
//! Library-consumable entry point wiring the whole run together: boundary
//! validation, the three evidence adapters (run concurrently, each with its
//! own bounded timeout), case record assembly, the audit append, and the
//! report renderings derived from the same in-memory record without
//! re-querying.
//!
//! Evidence failures degrade individual slots; only validation and storage
//! failures abort the run. Internal side-effects (printing, styling) are
//! excluded so the facade can be embedded and tested directly.

use std::path::PathBuf;

use crate::audit::AuditLog;
use crate::config::Config;
use crate::errors::Result;
use crate::geo::lookup_geolocation;
use crate::map::render_map;
use crate::netutil::{lookup_reverse_dns, parse_ip};
use crate::record::{CaseRecord, Evidence};
use crate::registration::lookup_registration;
use crate::report::{render_html, render_text};

/// Caller-supplied inputs for one run.
#[derive(Debug, Clone)]
pub struct InvestigationRequest {
    pub ip: String,
    pub investigator: String,
    pub case_number: String,

    /// Per-source toggles; a disabled source records as unavailable.
    pub use_registration: bool,
    pub use_reverse_dns: bool,
    pub use_geolocation: bool,
}

impl InvestigationRequest {
    pub fn new(
        ip: impl Into<String>,
        investigator: impl Into<String>,
        case_number: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            investigator: investigator.into(),
            case_number: case_number.into(),
            use_registration: true,
            use_reverse_dns: true,
            use_geolocation: true,
        }
    }
}

/// Completed run: the persisted record plus its derived renderings.
#[derive(Debug, Clone)]
pub struct Investigation {
    pub record: CaseRecord,
    pub text_report: String,
    pub html_report: String,

    /// Non-fatal evidence degradations encountered along the way.
    pub warnings: Vec<String>,
}

/// Run one investigation end to end.
///
/// Validates inputs before any network call, gathers the three evidence
/// slots concurrently, builds the immutable record, appends it to the audit
/// log, and renders both reports from the in-memory record. The record is
/// returned even though it was persisted, so callers never re-read the
/// store for rendering.
pub async fn run(request: &InvestigationRequest, config: &Config) -> Result<Investigation> {
    // Fail fast on malformed input; no lookup is attempted otherwise.
    let ip = parse_ip(&request.ip)?;
    CaseRecord::validate_inputs(&request.investigator, &request.case_number, &request.ip)?;

    let mut warnings = Vec::new();

    let geo_db: PathBuf = config.storage.geo_database.clone();
    let registration_fut = async {
        if request.use_registration {
            lookup_registration(ip, &config.network).await
        } else {
            Evidence::Unavailable
        }
    };
    let reverse_dns_fut = async {
        if request.use_reverse_dns {
            lookup_reverse_dns(ip, config.network.dns_timeout).await
        } else {
            Evidence::Unavailable
        }
    };
    let geolocation_fut = async {
        if !request.use_geolocation {
            return Ok(Evidence::Unavailable);
        }
        // Local file read; cheap enough to run inline on the worker.
        match lookup_geolocation(ip, &geo_db) {
            Ok(geo) => Ok(Evidence::Present(geo)),
            Err(e) => Err(e),
        }
    };

    let (registration, reverse_dns, geolocation) =
        tokio::join!(registration_fut, reverse_dns_fut, geolocation_fut);

    if registration.is_unavailable() && request.use_registration {
        warnings.push(format!("no registration evidence for {ip}"));
    }
    if reverse_dns.is_unavailable() && request.use_reverse_dns {
        warnings.push(format!("no PTR record for {ip}"));
    }
    // Geolocation is the one adapter whose failure carries a diagnostic;
    // it degrades the slot but never blocks the other evidence.
    let geolocation = match geolocation {
        Ok(ev) => ev,
        Err(e) => {
            log::warn!("{e}");
            warnings.push(e.to_string());
            Evidence::Unavailable
        }
    };

    let record = CaseRecord::build(
        &request.investigator,
        &request.case_number,
        &ip.to_string(),
        registration,
        reverse_dns,
        geolocation,
    )?;

    // Persist before rendering: the audit trail is the system of record.
    AuditLog::new(&config.storage.audit_log).append(&record)?;

    let map_fragment = record
        .geolocation
        .as_present()
        .map(|geo| render_map(geo.latitude, geo.longitude));

    let text_report = render_text(&record);
    let html_report = render_html(&record, config.report.html_style, map_fragment.as_deref());

    Ok(Investigation {
        record,
        text_report,
        html_report,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn offline_request() -> InvestigationRequest {
        let mut req = InvestigationRequest::new("203.0.113.9", "J. Doe", "C-1001");
        req.use_registration = false;
        req.use_reverse_dns = false;
        req.use_geolocation = false;
        req
    }

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.storage.audit_log = dir.path().join("audit_log.json");
        config.storage.geo_database = dir.path().join("GeoLite2-City.mmdb");
        config
    }

    #[tokio::test]
    async fn rejects_malformed_ip_before_any_lookup() {
        let dir = TempDir::new().unwrap();
        let mut req = offline_request();
        req.ip = "not.an.ip".into();

        let err = run(&req, &config_in(&dir)).await.unwrap_err();
        assert!(err.to_string().contains("Invalid IP address"));
        // Nothing was persisted.
        assert!(!dir.path().join("audit_log.json").exists());
    }

    #[tokio::test]
    async fn rejects_empty_investigator() {
        let dir = TempDir::new().unwrap();
        let mut req = offline_request();
        req.investigator = "".into();

        let err = run(&req, &config_in(&dir)).await.unwrap_err();
        assert!(err.to_string().contains("investigator"));
    }

    #[tokio::test]
    async fn missing_geo_database_degrades_and_run_continues() {
        let dir = TempDir::new().unwrap();
        let mut req = offline_request();
        req.use_geolocation = true; // DB path does not exist

        let result = run(&req, &config_in(&dir)).await.unwrap();
        assert!(result.record.geolocation.is_unavailable());
        assert!(result.warnings.iter().any(|w| w.contains("geolocation")));
        // No map link in either rendering.
        assert!(!result.text_report.contains("Google Maps Link"));
        assert!(!result.html_report.contains("Geolocation Map"));
        // The record was still persisted.
        let stored = AuditLog::new(dir.path().join("audit_log.json"))
            .read_all()
            .unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn record_is_persisted_and_reports_derived_from_it() {
        let dir = TempDir::new().unwrap();
        let req = offline_request();
        let config = config_in(&dir);

        let result = run(&req, &config).await.unwrap();
        let stored = AuditLog::new(&config.storage.audit_log)
            .last()
            .unwrap()
            .unwrap();
        assert_eq!(stored, result.record);
        assert!(result.text_report.contains("Investigator: J. Doe"));
        assert!(result
            .text_report
            .contains(&format!("Timestamp: {}", result.record.timestamp)));
    }

    #[tokio::test]
    async fn successive_runs_append_in_order() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        for i in 1..=3 {
            let mut req = offline_request();
            req.case_number = format!("C-{i}");
            run(&req, &config).await.unwrap();
        }

        let stored = AuditLog::new(&config.storage.audit_log).read_all().unwrap();
        let cases: Vec<&str> = stored.iter().map(|r| r.case_number.as_str()).collect();
        assert_eq!(cases, vec!["C-1", "C-2", "C-3"]);
    }
}
