//! ipdossier library
//!
//! Forensic lookup and reporting for a single IP address. This library
//! provides functionality to:
//!
//! - Gather registration (WHOIS), reverse-DNS and geolocation evidence
//! - Assemble the results into one immutable case record
//! - Append the record to a durable, append-only audit log
//! - Render plain-text and HTML reports (the latter with an embedded map)
//!   from the same in-memory record without re-querying
//!
//! # Example
//!
//! ```rust,no_run
//! use ipdossier::config::Config;
//! use ipdossier::investigate::{self, InvestigationRequest};
//!
//! # async fn demo() -> ipdossier::errors::Result<()> {
//! let config = Config::from_env();
//! let request = InvestigationRequest::new("8.8.8.8", "J. Doe", "C-1001");
//! let investigation = investigate::run(&request, &config).await?;
//! println!("{}", investigation.text_report);
//! # Ok(())
//! # }
//! ```

// Re-export all modules for library use
pub mod audit;
pub mod cli;
pub mod config;
pub mod errors;
pub mod geo;
pub mod investigate;
pub mod map;
pub mod netutil;
pub mod record;
pub mod registration;
pub mod report;

// Re-export commonly used types and functions for convenience
pub use audit::AuditLog;
pub use errors::{ErrorCategory, IpDossierError, Result};
pub use investigate::{Investigation, InvestigationRequest};
pub use record::{CaseRecord, Evidence, GeoInfo, RegistrationInfo};
pub use report::{render_html, render_text, HtmlStyle};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
