//! File-backed cache entries.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from cache setup and access.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache directory `{0}` is not a writable directory")]
    BadDirectory(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One named cache entry under the cache directory.
///
/// An entry can be content-addressed: [`FileCache::address`] derives a
/// digest from the source data, so a change in the source lands in a new
/// file and the previous generations become sweepable garbage.
#[derive(Debug, Clone)]
pub struct FileCache {
    directory: PathBuf,
    name: String,
    ttl: Option<Duration>,
    uid: Option<String>,
}

impl FileCache {
    /// Create an entry handle. `ttl_secs` of zero means freshness checks
    /// always fail and the entry is rebuilt on every use.
    pub fn new(directory: &Path, name: &str, ttl_secs: u64) -> Result<Self, CacheError> {
        let metadata = fs::metadata(directory)
            .map_err(|_| CacheError::BadDirectory(directory.to_path_buf()))?;
        if !metadata.is_dir() || metadata.permissions().readonly() {
            return Err(CacheError::BadDirectory(directory.to_path_buf()));
        }

        Ok(Self {
            directory: directory.to_path_buf(),
            name: name.to_string(),
            ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            uid: None,
        })
    }

    /// Bind this entry to the digest of `source`, making it
    /// content-addressed.
    pub fn address(&mut self, source: &[u8]) {
        let digest = Sha256::digest(source);
        let mut uid = String::with_capacity(16);
        for byte in digest.iter().take(8) {
            use std::fmt::Write;
            let _ = write!(uid, "{byte:02x}");
        }
        self.uid = Some(uid);
    }

    /// Path of the entry's backing file.
    pub fn path(&self) -> PathBuf {
        let file_name = match &self.uid {
            Some(uid) => format!("cache-{}-{uid}.cache", self.name),
            None => format!("cache-{}.cache", self.name),
        };
        self.directory.join(file_name)
    }

    /// Write the entry, sweeping stale generations of the same name
    /// first.
    pub fn save(&self, data: &[u8]) -> Result<(), CacheError> {
        if self.uid.is_some() {
            self.sweep_generations()?;
        }
        fs::write(self.path(), data)?;
        Ok(())
    }

    /// True when the backing file exists and is younger than the TTL.
    pub fn fresh(&self) -> bool {
        let Some(ttl) = self.ttl else {
            return false;
        };
        let Ok(metadata) = fs::metadata(self.path()) else {
            return false;
        };
        metadata
            .modified()
            .ok()
            .and_then(|mtime| SystemTime::now().duration_since(mtime).ok())
            .map(|age| age < ttl)
            .unwrap_or(false)
    }

    pub fn read(&self) -> Result<Vec<u8>, CacheError> {
        Ok(fs::read(self.path())?)
    }

    /// Remove every file belonging to this entry, all generations
    /// included.
    pub fn purge(&self) -> Result<(), CacheError> {
        let prefix = format!("cache-{}", self.name);
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with(&prefix) && file_name.ends_with(".cache") {
                let _ = fs::remove_file(entry.path());
            }
        }
        Ok(())
    }

    /// Remove generations of this entry other than the currently
    /// addressed one.
    fn sweep_generations(&self) -> Result<(), CacheError> {
        let prefix = format!("cache-{}-", self.name);
        let keep = self.path();
        for entry in fs::read_dir(&self.directory)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with(&prefix)
                && file_name.ends_with(".cache")
                && entry.path() != keep
            {
                let _ = fs::remove_file(entry.path());
            }
        }
        Ok(())
    }
}
