//! Configuration management for ipdossier.
//!
//! Centralizes network timeout settings and the file targets of a run
//! (geolocation database, audit log, report files). Values come from
//! documented defaults, `IPDOSSIER_*` environment variables, and finally
//! the command line, in that precedence order. Nothing here is global
//! mutable state: the writer and renderers receive their targets
//! explicitly, so the same logic can be pointed at different stores.

use std::path::PathBuf;
use std::time::Duration;

use crate::cli::Cli;
use crate::errors::{IpDossierError, Result};
use crate::report::HtmlStyle;

/// Default audit log filename (document-array JSON form).
pub const DEFAULT_AUDIT_LOG: &str = "audit_log.json";
/// Default text report filename (overwritten each run).
pub const DEFAULT_TEXT_REPORT: &str = "ip_analysis_report.txt";
/// Default HTML report filename (overwritten each run).
pub const DEFAULT_HTML_REPORT: &str = "ip_analysis_report.html";
/// Default GeoLite2 City database filename, resolved in the working directory.
pub const DEFAULT_GEO_DATABASE: &str = "GeoLite2-City.mmdb";

/// Main configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub network: NetworkConfig,
    pub storage: StorageConfig,
    pub report: ReportConfig,
}

/// Network-related configuration options.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Timeout for reverse-DNS (PTR) queries
    pub dns_timeout: Duration,

    /// Timeout per WHOIS server round-trip
    pub whois_timeout: Duration,

    /// Maximum number of WHOIS referral hops
    pub max_whois_depth: usize,
}

/// File targets for persistence and generated artifacts.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Append-only audit log path
    pub audit_log: PathBuf,

    /// Path to the GeoLite2 City database
    pub geo_database: PathBuf,
}

/// Report output configuration.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub text_report: PathBuf,
    pub html_report: PathBuf,
    pub html_style: HtmlStyle,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            dns_timeout: Duration::from_secs(5),
            whois_timeout: Duration::from_secs(10),
            max_whois_depth: 6,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audit_log: PathBuf::from(DEFAULT_AUDIT_LOG),
            geo_database: PathBuf::from(DEFAULT_GEO_DATABASE),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            text_report: PathBuf::from(DEFAULT_TEXT_REPORT),
            html_report: PathBuf::from(DEFAULT_HTML_REPORT),
            html_style: HtmlStyle::Card,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables on top of defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(timeout) = std::env::var("IPDOSSIER_DNS_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.network.dns_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(timeout) = std::env::var("IPDOSSIER_WHOIS_TIMEOUT_SECS") {
            if let Ok(secs) = timeout.parse::<u64>() {
                config.network.whois_timeout = Duration::from_secs(secs);
            }
        }

        if let Ok(depth) = std::env::var("IPDOSSIER_MAX_WHOIS_DEPTH") {
            if let Ok(d) = depth.parse::<usize>() {
                config.network.max_whois_depth = d;
            }
        }

        if let Ok(path) = std::env::var("IPDOSSIER_AUDIT_LOG") {
            config.storage.audit_log = PathBuf::from(path);
        }

        if let Ok(path) = std::env::var("IPDOSSIER_GEO_DATABASE") {
            config.storage.geo_database = PathBuf::from(path);
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence.
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        if let Some(ref path) = cli.audit_log {
            self.storage.audit_log = PathBuf::from(path);
        }
        if let Some(ref path) = cli.geo_database {
            self.storage.geo_database = PathBuf::from(path);
        }
        if let Some(ref path) = cli.text_report {
            self.report.text_report = PathBuf::from(path);
        }
        if let Some(ref path) = cli.html_report {
            self.report.html_report = PathBuf::from(path);
        }
        if cli.minimal_html {
            self.report.html_style = HtmlStyle::Minimal;
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.network.dns_timeout.as_secs() == 0 {
            return Err(IpDossierError::configuration(
                "network.dns_timeout must be greater than 0",
            ));
        }
        if self.network.whois_timeout.as_secs() == 0 {
            return Err(IpDossierError::configuration(
                "network.whois_timeout must be greater than 0",
            ));
        }
        if self.network.max_whois_depth == 0 {
            return Err(IpDossierError::configuration(
                "network.max_whois_depth must be at least 1",
            ));
        }
        if self.storage.audit_log.as_os_str().is_empty() {
            return Err(IpDossierError::configuration(
                "storage.audit_log must not be empty",
            ));
        }
        Ok(())
    }
}
