//! Filesystem-backed cache tier
//!
//! Each namespace owns one directory holding one file per key:
//! `{sanitized cache key}.cache`, containing a JSON-encoded
//! [`CacheRecord`]. Writes go to a temporary file first and are renamed
//! into place. There is no in-process locking; concurrent writers to the
//! same key resolve last-write-wins at the filesystem level.

use crate::constants::{DISK_TEMP_SUFFIX, DISK_WRITE_PROBE_FILE};
use crate::utils::KeyPattern;
use chrono::{DateTime, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tiercache_domain::constants::{CACHE_FILE_EXTENSION, FILE_SAFE_SEPARATOR};
use tiercache_domain::error::{Error, Result};
use tiercache_domain::value_objects::{CacheKey, CacheRecord, file_pattern, file_safe};
use tracing::{debug, error, warn};

/// Directory name for a namespace, always a single child of the base dir
///
/// Leading dots become separators so `.`, `..` and hidden names cannot
/// resolve outside the base directory or vanish from listings.
fn directory_name(cache_name: &str) -> String {
    let safe = file_safe(cache_name, false);
    let dots = safe.len() - safe.trim_start_matches('.').len();
    let name = format!("{}{}", FILE_SAFE_SEPARATOR.to_string().repeat(dots), &safe[dots..]);
    if name.is_empty() {
        FILE_SAFE_SEPARATOR.to_string()
    } else {
        name
    }
}

/// Disk store for one namespace
///
/// A store whose directory failed the write self-test is *unavailable*:
/// reads miss, writes fail and scans find nothing.
#[derive(Debug, Clone)]
pub struct DiskStore {
    directory: Option<PathBuf>,
}

impl DiskStore {
    /// Open the namespace directory `base_dir/<cache_name>`
    ///
    /// Creates the directory (`mkdir -p`) and verifies it is writable.
    /// Failures are logged and leave the store unavailable.
    pub fn open<P: AsRef<Path>>(base_dir: P, cache_name: &str) -> Self {
        let directory = base_dir.as_ref().join(directory_name(cache_name));

        match Self::prepare(&directory) {
            Ok(()) => {
                debug!(cache_name, path = %directory.display(), "Disk cache ready");
                Self {
                    directory: Some(directory),
                }
            }
            Err(e) => {
                error!(cache_name, path = %directory.display(), error = %e, "Disk cache setup failed");
                Self::unavailable()
            }
        }
    }

    /// A store that never persists anything
    pub fn unavailable() -> Self {
        Self { directory: None }
    }

    fn prepare(directory: &Path) -> Result<()> {
        fs::create_dir_all(directory).map_err(|e| {
            Error::io_with_source(
                format!("Failed to create cache directory {}", directory.display()),
                e,
            )
        })?;

        let probe = directory.join(DISK_WRITE_PROBE_FILE);
        fs::write(&probe, b"")
            .and_then(|()| fs::remove_file(&probe))
            .map_err(|e| {
                Error::io_with_source(
                    format!("Cache directory {} is not writable", directory.display()),
                    e,
                )
            })
    }

    /// Whether the directory passed the write self-test
    pub fn is_available(&self) -> bool {
        self.directory.is_some()
    }

    /// Namespace directory
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// File backing `key`
    pub fn path_for(&self, key: &CacheKey) -> Option<PathBuf> {
        self.directory.as_ref().map(|dir| dir.join(key.file_name()))
    }

    /// Read the record stored for `key`
    ///
    /// # Returns
    /// `Ok(None)` when no file exists; an error when the file cannot be read
    /// or does not hold a valid record.
    pub fn read(&self, key: &CacheKey) -> Result<Option<CacheRecord>> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };

        match fs::read(&path) {
            Ok(bytes) => CacheRecord::from_bytes(&bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io_with_source(
                format!("Failed to read {}", path.display()),
                e,
            )),
        }
    }

    /// Write the record for `key`
    pub fn write(&self, key: &CacheKey, record: &CacheRecord) -> Result<()> {
        let (Some(directory), Some(path)) = (self.directory.as_ref(), self.path_for(key)) else {
            return Err(Error::cache("Disk cache is unavailable"));
        };

        let temp = directory.join(format!(
            ".{}.{}.{}",
            key.file_name(),
            uuid::Uuid::new_v4().simple(),
            DISK_TEMP_SUFFIX
        ));
        let bytes = record.to_bytes()?;

        if let Err(e) = fs::write(&temp, bytes) {
            let _ = fs::remove_file(&temp);
            return Err(Error::io_with_source(
                format!("Failed to write {}", temp.display()),
                e,
            ));
        }
        fs::rename(&temp, &path).map_err(|e| {
            let _ = fs::remove_file(&temp);
            Error::io_with_source(format!("Failed to move record into {}", path.display()), e)
        })
    }

    /// Remove the record for `key`
    ///
    /// # Returns
    /// True if a file was removed
    pub fn remove(&self, key: &CacheKey) -> Result<bool> {
        match self.path_for(key) {
            Some(path) => remove_file_if_exists(&path),
            None => Ok(false),
        }
    }

    /// Remove every record whose `expires_at <= now`
    ///
    /// Unreadable records are removed as well. Per-file failures are logged
    /// and skipped.
    ///
    /// # Returns
    /// The number of files removed
    pub fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize> {
        let mut removed = 0;
        for path in self.record_files()? {
            let expired = match fs::read(&path) {
                Ok(bytes) => match CacheRecord::from_bytes(&bytes) {
                    Ok(record) => record.is_expired(now),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Removing unreadable cache record");
                        true
                    }
                },
                // Removed concurrently
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable cache file");
                    false
                }
            };

            if expired {
                match remove_file_if_exists(&path) {
                    Ok(true) => removed += 1,
                    Ok(false) => {}
                    Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove expired record"),
                }
            }
        }
        Ok(removed)
    }

    /// Remove every record whose file name matches the namespaced `pattern`
    ///
    /// `pattern` uses key syntax (`tenant:*`); it is mapped onto file names
    /// the same way keys are.
    ///
    /// # Returns
    /// The number of files removed
    pub fn remove_matching(&self, cache_name: &str, pattern: &str) -> Result<usize> {
        let matcher = KeyPattern::new(&file_pattern(cache_name, pattern))?;
        let mut removed = 0;
        for path in self.record_files()? {
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| matcher.matches(name));
            if !matches {
                continue;
            }
            match remove_file_if_exists(&path) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to remove cache record"),
            }
        }
        Ok(removed)
    }

    /// Number of record files currently on disk
    pub fn entry_count(&self) -> usize {
        self.record_files().map(|files| files.len()).unwrap_or(0)
    }

    fn record_files(&self) -> Result<Vec<PathBuf>> {
        let Some(directory) = self.directory.as_ref() else {
            return Ok(Vec::new());
        };

        let entries = fs::read_dir(directory).map_err(|e| {
            Error::io_with_source(format!("Failed to list {}", directory.display()), e)
        })?;

        Ok(entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|ext| ext.to_str()) == Some(CACHE_FILE_EXTENSION)
            })
            .collect())
    }
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(Error::io_with_source(
            format!("Failed to remove {}", path.display()),
            e,
        )),
    }
}
