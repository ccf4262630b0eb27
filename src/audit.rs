//! Append-only audit log.
//!
//! Document-array form: the store is one JSON array of `CaseRecord`s.
//! An append reads the existing array, pushes the new record, writes the
//! result to a temporary file in the same directory, and atomically
//! persists it over the log path, so a partial write can never corrupt
//! previously committed entries. A sibling `.lock` file guards the
//! read-modify-write against concurrent processes with an advisory lock.
//!
//! Appends are O(size-of-log); acceptable for a single-investigator
//! interactive tool, and in exchange the store is a single self-describing
//! document that round-trips records exactly. Existing entries are never
//! rewritten in content and never deleted.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::errors::{IpDossierError, Result};
use crate::record::CaseRecord;

/// Handle to one audit log file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Create a handle for the log at `path`. The file itself is created
    /// lazily on the first append (an absent store is an empty array).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record to the store.
    ///
    /// Fails with a `Storage` error when the medium cannot be read or
    /// written; the borrowed record is untouched either way, so the caller
    /// can retry the write without re-running any lookup.
    pub fn append(&self, record: &CaseRecord) -> Result<()> {
        let _lock = self.acquire_lock()?;

        let mut records = self.read_all_unlocked()?;
        records.push(record.clone());

        let body = serde_json::to_string_pretty(&records)
            .map_err(|e| self.storage_err("serialize", e))?;

        let dir = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(d) => tempfile::NamedTempFile::new_in(d),
            None => tempfile::NamedTempFile::new_in("."),
        }
        .map_err(|e| self.storage_err("create temp file", e))?;

        use std::io::Write;
        tmp.write_all(body.as_bytes())
            .and_then(|_| tmp.flush())
            .map_err(|e| self.storage_err("write temp file", e))?;

        tmp.persist(&self.path)
            .map_err(|e| self.storage_err("atomic replace", e.error))?;

        Ok(())
    }

    /// Read every record in write order. An absent store is empty.
    pub fn read_all(&self) -> Result<Vec<CaseRecord>> {
        let _lock = self.acquire_lock()?;
        self.read_all_unlocked()
    }

    /// The most recently appended record, if any.
    pub fn last(&self) -> Result<Option<CaseRecord>> {
        Ok(self.read_all()?.pop())
    }

    fn read_all_unlocked(&self) -> Result<Vec<CaseRecord>> {
        let mut file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.storage_err("open", e)),
        };

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| self.storage_err("read", e))?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&contents).map_err(|e| self.storage_err("parse", e))
    }

    /// Advisory lock serializing the read-modify-write cycle across
    /// processes sharing the same store.
    fn acquire_lock(&self) -> Result<LockGuard> {
        let lock_path = self.lock_path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(&lock_path)
            .map_err(|e| self.storage_err("open lock file", e))?;
        file.lock_exclusive()
            .map_err(|e| self.storage_err("acquire lock", e))?;
        Ok(LockGuard { file })
    }

    fn lock_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".lock");
        PathBuf::from(os)
    }

    fn storage_err(
        &self,
        operation: &str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> IpDossierError {
        IpDossierError::storage(self.path.display().to_string(), operation, source)
    }
}

/// Releases the advisory lock on drop.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Evidence, GeoInfo, RegistrationInfo};
    use tempfile::TempDir;

    fn record(case_number: &str) -> CaseRecord {
        CaseRecord {
            investigator: "J. Doe".into(),
            case_number: case_number.into(),
            timestamp: "2024-05-01 12:00:00".into(),
            ip_address: "8.8.8.8".into(),
            registration: Evidence::Present(RegistrationInfo {
                asn: Some("15169".into()),
                ..Default::default()
            }),
            reverse_dns: Evidence::Unavailable,
            geolocation: Evidence::Present(GeoInfo {
                country_iso_code: None,
                country_name: None,
                city_name: None,
                postal_code: None,
                latitude: 37.4,
                longitude: -122.1,
                time_zone: None,
            }),
        }
    }

    #[test]
    fn absent_store_reads_empty() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("audit_log.json"));
        assert!(log.read_all().unwrap().is_empty());
        assert!(log.last().unwrap().is_none());
    }

    #[test]
    fn append_then_read_back_in_write_order() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("audit_log.json"));

        for i in 0..5 {
            log.append(&record(&format!("C-{i}"))).unwrap();
        }

        let records = log.read_all().unwrap();
        assert_eq!(records.len(), 5);
        for (i, rec) in records.iter().enumerate() {
            assert_eq!(rec.case_number, format!("C-{i}"));
        }
        assert_eq!(log.last().unwrap().unwrap().case_number, "C-4");
    }

    #[test]
    fn append_preserves_prior_entries_exactly() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("audit_log.json"));

        log.append(&record("C-1")).unwrap();
        log.append(&record("C-2")).unwrap();
        let before: Vec<String> = log
            .read_all()
            .unwrap()
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect();

        log.append(&record("C-3")).unwrap();
        let after: Vec<String> = log
            .read_all()
            .unwrap()
            .iter()
            .map(|r| serde_json::to_string(r).unwrap())
            .collect();

        assert_eq!(after.len(), 3);
        assert_eq!(&after[..2], &before[..]);
    }

    #[test]
    fn round_trip_preserves_optional_field_absence() {
        let dir = TempDir::new().unwrap();
        let log = AuditLog::new(dir.path().join("audit_log.json"));

        let original = record("C-1");
        log.append(&original).unwrap();

        let back = log.last().unwrap().unwrap();
        assert_eq!(back, original);
        // Absent fields come back absent, not coerced to empty strings.
        let reg = back.registration.as_present().unwrap();
        assert!(reg.registrar.is_none());
        assert!(reg.cidr.is_none());
        assert!(back.reverse_dns.is_unavailable());
    }

    #[test]
    fn unwritable_medium_surfaces_storage_error() {
        let dir = TempDir::new().unwrap();
        // A directory at the log path makes both read and write fail.
        let path = dir.path().join("audit_log.json");
        std::fs::create_dir(&path).unwrap();

        let log = AuditLog::new(&path);
        let err = log.append(&record("C-1")).unwrap_err();
        match err {
            IpDossierError::Storage { path: p, .. } => {
                assert!(p.contains("audit_log.json"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
