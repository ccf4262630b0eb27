//! Unified error handling for ipdossier.
//!
//! A `thiserror`-based model with:
//!   * Typed variants for the failure domains of an investigation run
//!   * A categorization layer (`ErrorCategory`) for reporting
//!   * Helper constructors
//!   * `From` conversions for common lower-level errors
//!
//! The taxonomy follows the pipeline's propagation rules:
//!   - Validation errors are raised at the boundary, before any network call
//!   - Evidence adapters absorb source-library failures and re-express them
//!     as `LookupUnavailable` (no answer) or `Lookup` (could not be asked)
//!   - Storage errors are fatal to the run and carry path + cause so the
//!     caller can diagnose and retry without losing the in-memory record

use std::io;
use std::net::AddrParseError;

use thiserror::Error;

/// High-level classification for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Lookup,
    Storage,
    Internal,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Lookup => "lookup",
            ErrorCategory::Storage => "storage",
            ErrorCategory::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Primary application error type.
#[derive(Error, Debug)]
pub enum IpDossierError {
    // ------------------------ Input / Validation ----------------------------
    #[error("Invalid IP address format: {ip}")]
    InvalidIpAddress { ip: String },

    #[error("Missing required input '{field}': {reason}")]
    Validation { field: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ----------------------------- Lookups ----------------------------------
    #[error("No {source_name} evidence available for {target}")]
    LookupUnavailable { source_name: String, target: String },

    #[error("{source_name} lookup failed for '{target}': {reason}")]
    Lookup {
        source_name: String,
        target: String,
        reason: String,
    },

    // ----------------------------- Storage ----------------------------------
    #[error("Audit store error during {operation} on {path}: {source}")]
    Storage {
        path: String,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    // ----------------------------- I/O / FS ---------------------------------
    #[error("I/O error during {operation} on {path}: {source}")]
    Io {
        path: String,
        operation: String,
        #[source]
        source: io::Error,
    },

    // ---------------------------- Internal ----------------------------------
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl IpDossierError {
    /// Categorize the error for reporting / exit handling.
    pub fn category(&self) -> ErrorCategory {
        use IpDossierError::*;
        match self {
            InvalidIpAddress { .. } | Validation { .. } | Configuration { .. } => {
                ErrorCategory::Validation
            }
            LookupUnavailable { .. } | Lookup { .. } => ErrorCategory::Lookup,
            Storage { .. } => ErrorCategory::Storage,
            Io { .. } | Internal { .. } => ErrorCategory::Internal,
        }
    }

    // ---------------------------- Constructors -----------------------------

    pub fn invalid_ip(ip: impl Into<String>) -> Self {
        Self::InvalidIpAddress { ip: ip.into() }
    }

    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn lookup_unavailable(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self::LookupUnavailable {
            source_name: source.into(),
            target: target.into(),
        }
    }

    pub fn lookup(
        source: impl Into<String>,
        target: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Lookup {
            source_name: source.into(),
            target: target.into(),
            reason: reason.into(),
        }
    }

    pub fn storage(
        path: impl Into<String>,
        operation: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Storage {
            path: path.into(),
            operation: operation.into(),
            source: source.into(),
        }
    }

    pub fn io(path: impl Into<String>, operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Public result alias.
pub type Result<T> = std::result::Result<T, IpDossierError>;

/// Map standard IO errors into `Io` variant (generic context).
impl From<io::Error> for IpDossierError {
    fn from(e: io::Error) -> Self {
        IpDossierError::Io {
            path: "<unknown>".into(),
            operation: "unspecified".into(),
            source: e,
        }
    }
}

impl From<AddrParseError> for IpDossierError {
    fn from(e: AddrParseError) -> Self {
        IpDossierError::InvalidIpAddress { ip: e.to_string() }
    }
}

impl From<serde_json::Error> for IpDossierError {
    fn from(e: serde_json::Error) -> Self {
        IpDossierError::Internal {
            message: "JSON serialization failed".into(),
            source: Some(Box::new(e)),
        }
    }
}

/// Extension trait for enriching IO results with path + operation context.
pub trait IoResultExt<T> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, io::Error> {
    fn with_path(self, path: impl Into<String>, operation: impl Into<String>) -> Result<T> {
        self.map_err(|e| IpDossierError::io(path.into(), operation.into(), e))
    }
}
