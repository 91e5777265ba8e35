//! Disk-backed store for league API responses
//!
//! Provides a `CacheStore` that keeps one JSON file per request key, written
//! atomically, and that deletes entries it can no longer parse.

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::key::{sanitize, RequestKey};

/// A cached outcome for one request key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CacheEntry {
    /// A validated payload returned by the API
    Payload { data: Value },
    /// The request is known to have no usable data
    NoData,
}

impl CacheEntry {
    /// Converts the entry into the payload it holds, if any
    pub fn into_payload(self) -> Option<Value> {
        match self {
            CacheEntry::Payload { data } => Some(data),
            CacheEntry::NoData => None,
        }
    }
}

/// On-disk wrapper for a cache entry
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    /// When the entry was written
    cached_at: DateTime<Utc>,
    /// The cached outcome
    entry: CacheEntry,
}

/// Reads and writes cache entries under a root directory
///
/// Layout is `<root>/<league>/<year>/period_<PP>_<views>.json`. The default
/// root is the XDG cache directory (`~/.cache/fflcache/` on Linux).
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Root directory for all cache files
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store in the XDG-compliant cache directory
    ///
    /// Returns `None` if the cache directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "fflcache")?;
        let cache_dir = project_dirs.cache_dir().to_path_buf();
        Some(Self { cache_dir })
    }

    /// Creates a store rooted at a custom directory
    pub fn with_dir(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
        }
    }

    /// Root directory of this store
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Returns the file path used for `key`
    pub fn path_for(&self, key: &RequestKey) -> PathBuf {
        self.league_dir(&key.league_id)
            .join(key.year.to_string())
            .join(key.file_name())
    }

    fn league_dir(&self, league_id: &str) -> PathBuf {
        self.cache_dir.join(sanitize(league_id))
    }

    /// Reads the entry stored for `key`
    ///
    /// Returns `None` when nothing is stored. An entry that cannot be parsed
    /// is deleted and also reported as `None`.
    pub fn get(&self, key: &RequestKey) -> Option<CacheEntry> {
        let path = self.path_for(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(%key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(%key, path = %path.display(), error = %e, "failed to read cache entry");
                return None;
            }
        };

        match serde_json::from_slice::<StoredEntry>(&bytes) {
            Ok(stored) => {
                debug!(%key, cached_at = %stored.cached_at, "cache hit");
                Some(stored.entry)
            }
            Err(e) => {
                warn!(%key, path = %path.display(), error = %e, "corrupt cache entry, deleting");
                if let Err(e) = fs::remove_file(&path) {
                    if e.kind() != io::ErrorKind::NotFound {
                        warn!(path = %path.display(), error = %e, "failed to delete corrupt cache entry");
                    }
                }
                None
            }
        }
    }

    /// Stores `entry` under `key`, replacing any previous entry
    ///
    /// The entry is written to a temporary file next to its final location and
    /// renamed into place, so readers never observe a partial write.
    pub fn put(&self, key: &RequestKey, entry: &CacheEntry) -> io::Result<()> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let stored = StoredEntry {
            cached_at: Utc::now(),
            entry: entry.clone(),
        };
        let json = serde_json::to_vec(&stored)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let temp_path = path.with_extension(format!("{}.tmp", std::process::id()));
        if let Err(e) = fs::write(&temp_path, json) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }
        if let Err(e) = fs::rename(&temp_path, &path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e);
        }

        debug!(%key, path = %path.display(), "cache entry written");
        Ok(())
    }

    /// Removes the entry for `key`; a missing entry is not an error
    pub fn remove(&self, key: &RequestKey) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }

    /// Removes every cached entry for a league
    pub fn clear_league(&self, league_id: &str) -> io::Result<()> {
        match fs::remove_dir_all(self.league_dir(league_id)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
