use clap::Parser;

/// Command-line interface definition.
///
/// All investigation inputs can be given as flags; whatever is missing is
/// prompted for interactively (the tool is aimed at a single investigator
/// working one IP at a time).
///
/// Verbosity levels:
/// 0 - silent (only final output)
/// 1 - errors (default)
/// 2 - warnings + errors
/// 5 - trace/debug
#[derive(Parser, Debug, Clone, Default)]
#[command(
    author,
    version,
    about = "Investigate a single IP address: registration, reverse DNS and geolocation, with an append-only audit trail and text/HTML reports"
)]
pub struct Cli {
    /// Subject IP address (IPv4 or IPv6 literal). Prompted for if omitted.
    pub ip: Option<String>,

    /// Investigator name recorded in the case file. Prompted for if omitted.
    #[arg(long)]
    pub investigator: Option<String>,

    /// Case number recorded in the case file. Prompted for if omitted.
    #[arg(long = "case-number")]
    pub case_number: Option<String>,

    /// Path to the GeoLite2-City.mmdb database (default: ./GeoLite2-City.mmdb)
    #[arg(long = "geo-db", value_name = "FILE")]
    pub geo_database: Option<String>,

    /// Audit log path (default: ./audit_log.json)
    #[arg(long = "audit-log", value_name = "FILE")]
    pub audit_log: Option<String>,

    /// Text report path (default: ./ip_analysis_report.txt)
    #[arg(long = "text-report", value_name = "FILE")]
    pub text_report: Option<String>,

    /// HTML report path (default: ./ip_analysis_report.html)
    #[arg(long = "html-report", value_name = "FILE")]
    pub html_report: Option<String>,

    /// Render the minimal HTML layout instead of the card layout
    #[arg(long = "minimal-html", default_value_t = false)]
    pub minimal_html: bool,

    /// Skip the registration (WHOIS) lookup
    #[arg(long = "no-registration", default_value_t = false)]
    pub no_registration: bool,

    /// Skip the reverse-DNS lookup
    #[arg(long = "no-reverse-dns", default_value_t = false)]
    pub no_reverse_dns: bool,

    /// Skip the geolocation lookup
    #[arg(long = "no-geolocation", default_value_t = false)]
    pub no_geolocation: bool,

    /// Verbosity level (0,1,2,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are warning-level messages enabled?
    pub fn warn_enabled(&self) -> bool {
        self.verbose >= 2
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }
}
