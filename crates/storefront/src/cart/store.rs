//! Durable storage for the cart identifier.
//!
//! The identifier lives in a single site-wide entry (`cartId`) that expires
//! 30 days after it was last written. [`CartIdStore`] is the port the cart
//! manager talks to; [`MemoryCartIdStore`] backs tests and embedding, and
//! [`FileCartIdStore`] keeps a small JSON cookie jar on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the entry holding the cart identifier.
pub const CART_ID_KEY: &str = "cartId";

/// Lifetime of the cart identifier entry, in days.
pub const CART_ID_TTL_DAYS: i64 = 30;

/// Path scope of every entry.
pub const COOKIE_PATH: &str = "/";

/// Lifetime of the cart identifier entry.
#[must_use]
pub fn cart_id_ttl() -> TimeDelta {
    TimeDelta::days(CART_ID_TTL_DAYS)
}

/// Errors from a [`CartIdStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A thread panicked while holding the store lock.
    #[error("Store lock poisoned")]
    Poisoned,
}

/// A stored value with its absolute expiry and path scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEntry {
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub path: String,
}

impl StoredEntry {
    /// An entry expiring `ttl` from `now`, scoped to the whole site.
    #[must_use]
    pub fn new(value: impl Into<String>, now: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            value: value.into(),
            expires_at: now + ttl,
            path: COOKIE_PATH.to_string(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Render as a `Set-Cookie` header value.
    #[must_use]
    pub fn set_cookie(&self, key: &str) -> String {
        format!(
            "{key}={}; Expires={}; Path={}; SameSite=Lax",
            self.value,
            self.expires_at.format("%a, %d %b %Y %H:%M:%S GMT"),
            self.path
        )
    }
}

/// Key-value port for client-side durable state.
///
/// Expired entries read as absent.
pub trait CartIdStore: Send + Sync {
    /// Read a live entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StoreError>;

    /// Write an entry expiring `ttl` from now, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str, ttl: TimeDelta) -> Result<StoredEntry, StoreError>;

    /// Remove an entry. Removing a missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn expire(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// In-memory store
// =============================================================================

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemoryCartIdStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryCartIdStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartIdStore for MemoryCartIdStore {
    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StoreError> {
        let now = Utc::now();
        let entry = {
            let entries = self.entries.read().map_err(|_| StoreError::Poisoned)?;
            entries.get(key).cloned()
        };

        match entry {
            Some(entry) if entry.is_expired(now) => {
                self.expire(key)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: TimeDelta) -> Result<StoredEntry, StoreError> {
        let entry = StoredEntry::new(value, Utc::now(), ttl);
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .insert(key.to_string(), entry.clone());
        Ok(entry)
    }

    fn expire(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|_| StoreError::Poisoned)?
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// Store persisted as a JSON object of entries.
///
/// A missing file reads as empty. Every write rewrites the whole file.
#[derive(Debug)]
pub struct FileCartIdStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCartIdStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, StoredEntry>, StoreError> {
        match std::fs::read(&self.path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, entries: &HashMap<String, StoredEntry>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}

impl CartIdStore for FileCartIdStore {
    fn get(&self, key: &str) -> Result<Option<StoredEntry>, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.load()?;

        match entries.get(key) {
            Some(entry) if entry.is_expired(Utc::now()) => {
                entries.remove(key);
                self.save(&entries)?;
                Ok(None)
            }
            other => Ok(other.cloned()),
        }
    }

    fn set(&self, key: &str, value: &str, ttl: TimeDelta) -> Result<StoredEntry, StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.load()?;
        let entry = StoredEntry::new(value, Utc::now(), ttl);
        entries.insert(key.to_string(), entry.clone());
        self.save(&entries)?;
        Ok(entry)
    }

    fn expire(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_memory_store_set_get_expire() {
        let store = MemoryCartIdStore::new();
        assert!(store.get(CART_ID_KEY).unwrap().is_none());

        store.set(CART_ID_KEY, "gid://shopify/Cart/1", cart_id_ttl()).unwrap();
        let entry = store.get(CART_ID_KEY).unwrap().unwrap();
        assert_eq!(entry.value, "gid://shopify/Cart/1");
        assert_eq!(entry.path, "/");

        store.expire(CART_ID_KEY).unwrap();
        assert!(store.get(CART_ID_KEY).unwrap().is_none());
    }

    #[test]
    fn test_memory_store_expired_entry_reads_absent() {
        let store = MemoryCartIdStore::new();
        store.set(CART_ID_KEY, "stale", TimeDelta::seconds(-1)).unwrap();
        assert!(store.get(CART_ID_KEY).unwrap().is_none());
        assert!(store.entries.read().unwrap().is_empty());
    }

    #[test]
    fn test_set_uses_thirty_day_expiry() {
        let store = MemoryCartIdStore::new();
        let before = Utc::now();
        let entry = store.set(CART_ID_KEY, "c1", cart_id_ttl()).unwrap();
        let lifetime = entry.expires_at - before;
        assert!(lifetime <= TimeDelta::days(30));
        assert!(lifetime > TimeDelta::days(30) - TimeDelta::minutes(1));
    }

    #[test]
    fn test_set_cookie_rendering() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0).unwrap();
        let entry = StoredEntry::new("gid://shopify/Cart/abc", now, cart_id_ttl());
        assert_eq!(
            entry.set_cookie(CART_ID_KEY),
            "cartId=gid://shopify/Cart/abc; Expires=Sat, 31 Jan 2026 12:00:00 GMT; Path=/; SameSite=Lax"
        );
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");

        FileCartIdStore::new(&path)
            .set(CART_ID_KEY, "c1", cart_id_ttl())
            .unwrap();

        let reopened = FileCartIdStore::new(&path);
        assert_eq!(reopened.get(CART_ID_KEY).unwrap().unwrap().value, "c1");

        reopened.expire(CART_ID_KEY).unwrap();
        assert!(FileCartIdStore::new(&path).get(CART_ID_KEY).unwrap().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartIdStore::new(dir.path().join("nested/cookies.json"));
        assert!(store.get(CART_ID_KEY).unwrap().is_none());
        store.expire(CART_ID_KEY).unwrap();
    }

    #[test]
    fn test_file_store_prunes_expired() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        let store = FileCartIdStore::new(&path);
        store.set(CART_ID_KEY, "old", TimeDelta::seconds(-5)).unwrap();
        assert!(store.get(CART_ID_KEY).unwrap().is_none());

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(!raw.contains("old"));
    }

    #[test]
    fn test_file_store_rejects_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cookies.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            FileCartIdStore::new(&path).get(CART_ID_KEY),
            Err(StoreError::Serialization(_))
        ));
    }
}
