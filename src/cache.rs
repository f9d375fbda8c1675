//! JSON cache of the collections, one file per key.

use crate::config::Settings;
use crate::error::{KettleError, Result};
use chrono::{DateTime, Utc};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Cache entry names, one file per collection
pub mod keys {
    pub const PACKAGES: &str = "packages";
    pub const CASKS: &str = "casks";
    pub const SERVICES: &str = "services";
    pub const TAPS: &str = "taps";
    pub const TAP_INFOS: &str = "tap_infos";

    pub const ALL: &[&str] = &[PACKAGES, CASKS, SERVICES, TAPS, TAP_INFOS];
}

#[derive(Serialize)]
struct EntryRef<'a, T> {
    updated_at: DateTime<Utc>,
    data: &'a T,
}

#[derive(Deserialize)]
struct Entry<T> {
    updated_at: DateTime<Utc>,
    data: T,
}

/// A collection read back from the cache
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub data: T,
    pub updated_at: DateTime<Utc>,
}

/// JSON blobs on disk, one `<key>.json` file per collection.
///
/// Entries never expire; every refresh simply overwrites the previous one.
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.cache_dir.clone())
    }

    /// Get the cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the file backing a key
    pub fn entry_path(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(KettleError::InvalidState(format!(
                "Invalid cache key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Store a collection stamped with the current time
    pub fn save<T: Serialize>(&self, key: &str, data: &T) -> Result<DateTime<Utc>> {
        let updated_at = Utc::now();
        self.save_at(key, data, updated_at)?;
        Ok(updated_at)
    }

    /// Store a collection with an explicit timestamp
    pub fn save_at<T: Serialize>(
        &self,
        key: &str,
        data: &T,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let path = self.entry_path(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_vec(&EntryRef { updated_at, data })?;

        // Write a sibling then rename so readers never see a torn file
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;

        debug!("Cached {} at {}", key, path.display());
        Ok(())
    }

    /// Read a collection back. `None` when nothing was stored, or when the
    /// stored entry no longer decodes as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<Cached<T>>> {
        let Some(content) = self.read(key)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Entry<T>>(&content) {
            Ok(entry) => Ok(Some(Cached {
                data: entry.data,
                updated_at: entry.updated_at,
            })),
            Err(e) => {
                warn!("Ignoring unreadable cache entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    /// Timestamp of an entry without decoding its data
    pub fn last_updated(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self
            .load::<IgnoredAny>(key)?
            .map(|cached| cached.updated_at))
    }

    /// Delete one entry; missing entries are not an error
    pub fn remove(&self, key: &str) -> Result<()> {
        let path = self.entry_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete every entry, returning how many files were removed
    pub fn clear(&self) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
                std::fs::remove_file(&path)?;
                removed += 1;
            }
        }

        debug!("Removed {} cache entries from {}", removed, self.dir.display());
        Ok(removed)
    }

    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Package, Tap};
    use tempfile::TempDir;

    fn store() -> (TempDir, CacheStore) {
        let dir = TempDir::new().unwrap();
        let store = CacheStore::new(dir.path().join("cache"));
        (dir, store)
    }

    #[test]
    fn test_load_without_save_is_none() {
        let (_dir, store) = store();
        let loaded: Option<Cached<Vec<Package>>> = store.load(keys::PACKAGES).unwrap();
        assert!(loaded.is_none());
        assert!(store.last_updated(keys::PACKAGES).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let (_dir, store) = store();
        let packages = vec![Package::installed("git"), Package::installed("wget")];

        let stamp = store.save(keys::PACKAGES, &packages).unwrap();
        let loaded: Cached<Vec<Package>> = store.load(keys::PACKAGES).unwrap().unwrap();

        assert_eq!(loaded.data, packages);
        assert_eq!(loaded.updated_at, stamp);
        assert_eq!(store.last_updated(keys::PACKAGES).unwrap(), Some(stamp));
    }

    #[test]
    fn test_save_overwrites() {
        let (_dir, store) = store();
        store.save(keys::PACKAGES, &vec![Package::installed("old")]).unwrap();
        store.save(keys::PACKAGES, &vec![Package::installed("new")]).unwrap();

        let loaded: Cached<Vec<Package>> = store.load(keys::PACKAGES).unwrap().unwrap();
        assert_eq!(loaded.data.len(), 1);
        assert_eq!(loaded.data[0].name, "new");
        assert!(!store.dir().join("packages.json.tmp").exists());
    }

    #[test]
    fn test_entry_format() {
        let (_dir, store) = store();
        store.save(keys::TAPS, &Vec::<Tap>::new()).unwrap();

        let raw = std::fs::read_to_string(store.dir().join("taps.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["updated_at"].is_string());
        assert!(value["data"].is_array());
    }

    #[test]
    fn test_corrupt_entry_is_none() {
        let (_dir, store) = store();
        std::fs::create_dir_all(store.dir()).unwrap();
        std::fs::write(store.dir().join("services.json"), "{not json").unwrap();

        let loaded: Option<Cached<Vec<Package>>> = store.load(keys::SERVICES).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_invalid_key() {
        let (_dir, store) = store();
        assert!(store.entry_path("../escape").is_err());
        assert!(store.entry_path("").is_err());
    }

    #[test]
    fn test_clear() {
        let (_dir, store) = store();
        assert_eq!(store.clear().unwrap(), 0);

        store.save(keys::PACKAGES, &Vec::<Package>::new()).unwrap();
        store.save(keys::TAPS, &Vec::<Tap>::new()).unwrap();
        assert_eq!(store.clear().unwrap(), 2);

        let loaded: Option<Cached<Vec<Tap>>> = store.load(keys::TAPS).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_remove_missing_is_ok() {
        let (_dir, store) = store();
        store.remove(keys::CASKS).unwrap();
    }
}
