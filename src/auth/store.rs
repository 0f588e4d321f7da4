//! Persistent session storage.
//!
//! The session store owns the credential record: the access/refresh token
//! pair plus the logged-in caseworker's identity. Three named slots are kept
//! in a pluggable key/value backend - a JSON file under the cache directory
//! in production, an in-memory map in tests.
//!
//! The store never raises: absent data reads as `None`, and persistence
//! failures are logged and swallowed so a full disk can never break an
//! in-flight request.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::models::UserIdentity;

/// Slot names in the persisted key/value layout
const ACCESS_TOKEN_SLOT: &str = "access_token";
const REFRESH_TOKEN_SLOT: &str = "refresh_token";
const USER_SLOT: &str = "user";

/// Durable key/value storage for session slots.
///
/// Implementations must tolerate failure silently: session persistence is
/// best-effort and the caller has no recovery path for a write error.
pub trait StorageBackend: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory backend for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStorage {
    slots: Mutex<HashMap<String, String>>,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.remove(key);
        }
    }
}

/// File-backed backend: one JSON object holding all slots, written through
/// on every mutation so the session survives process restarts.
pub struct FileStorage {
    path: PathBuf,
    slots: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    pub fn new(path: PathBuf) -> Self {
        let slots = Self::load(&path);
        Self {
            path,
            slots: Mutex::new(slots),
        }
    }

    fn load(path: &PathBuf) -> HashMap<String, String> {
        if !path.exists() {
            return HashMap::new();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(slots) => slots,
                Err(error) => {
                    warn!(%error, path = %path.display(), "Session file is corrupt, starting empty");
                    HashMap::new()
                }
            },
            Err(error) => {
                warn!(%error, path = %path.display(), "Failed to read session file");
                HashMap::new()
            }
        }
    }

    fn persist(&self, slots: &HashMap<String, String>) {
        if let Some(parent) = self.path.parent() {
            if let Err(error) = std::fs::create_dir_all(parent) {
                warn!(%error, "Failed to create session directory");
                return;
            }
        }
        let contents = match serde_json::to_string_pretty(slots) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(%error, "Failed to serialize session");
                return;
            }
        };
        if let Err(error) = std::fs::write(&self.path, contents) {
            warn!(%error, path = %self.path.display(), "Failed to write session file");
        }
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.slots.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            slots.insert(key.to_string(), value.to_string());
            self.persist(&slots);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut slots) = self.slots.lock() {
            if slots.remove(key).is_some() {
                self.persist(&slots);
            }
        }
    }
}

/// The credential record owner.
///
/// Invariant: the access and refresh tokens are always written together via
/// `set_tokens` and cleared together via `clear`; the user identity is only
/// meaningful while a token pair exists.
pub struct SessionStore {
    backend: Box<dyn StorageBackend>,
}

impl SessionStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Store backed by an in-memory map (nothing survives the process).
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    /// Store backed by a JSON file at the given path.
    pub fn file(path: PathBuf) -> Self {
        Self::new(FileStorage::new(path))
    }

    pub fn access_token(&self) -> Option<String> {
        self.backend.get(ACCESS_TOKEN_SLOT)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.backend.get(REFRESH_TOKEN_SLOT)
    }

    pub fn user_identity(&self) -> Option<UserIdentity> {
        let raw = self.backend.get(USER_SLOT)?;
        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(error) => {
                warn!(%error, "Stored user identity is unreadable");
                None
            }
        }
    }

    /// Overwrite both tokens as a pair.
    pub fn set_tokens(&self, access: &str, refresh: &str) {
        self.backend.set(ACCESS_TOKEN_SLOT, access);
        self.backend.set(REFRESH_TOKEN_SLOT, refresh);
    }

    pub fn set_user_identity(&self, identity: &UserIdentity) {
        match serde_json::to_string(identity) {
            Ok(raw) => self.backend.set(USER_SLOT, &raw),
            Err(error) => warn!(%error, "Failed to serialize user identity"),
        }
    }

    /// Remove all three slots. Idempotent, never fails.
    pub fn clear(&self) {
        self.backend.remove(ACCESS_TOKEN_SLOT);
        self.backend.remove(REFRESH_TOKEN_SLOT);
        self.backend.remove(USER_SLOT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> UserIdentity {
        UserIdentity {
            id: "u1".to_string(),
            username: "asmith".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            email: Some("alice@agency.example".to_string()),
            employee_id: Some("E-100".to_string()),
            department: Some("Family Services".to_string()),
        }
    }

    #[test]
    fn test_tokens_round_trip() {
        let store = SessionStore::in_memory();
        assert_eq!(store.access_token(), None);

        store.set_tokens("access-1", "refresh-1");
        assert_eq!(store.access_token().as_deref(), Some("access-1"));
        assert_eq!(store.refresh_token().as_deref(), Some("refresh-1"));
    }

    #[test]
    fn test_clear_removes_all_slots() {
        let store = SessionStore::in_memory();
        store.set_tokens("access-1", "refresh-1");
        store.set_user_identity(&identity());

        store.clear();
        assert_eq!(store.access_token(), None);
        assert_eq!(store.refresh_token(), None);
        assert!(store.user_identity().is_none());

        // Idempotent on an already-empty store
        store.clear();
        assert_eq!(store.access_token(), None);
    }

    #[test]
    fn test_user_identity_round_trip() {
        let store = SessionStore::in_memory();
        store.set_user_identity(&identity());
        let read = store.user_identity().expect("identity should be present");
        assert_eq!(read, identity());
    }

    #[test]
    fn test_file_storage_survives_reload() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let store = SessionStore::file(path.clone());
        store.set_tokens("access-1", "refresh-1");
        store.set_user_identity(&identity());
        drop(store);

        let reloaded = SessionStore::file(path);
        assert_eq!(reloaded.access_token().as_deref(), Some("access-1"));
        assert_eq!(reloaded.refresh_token().as_deref(), Some("refresh-1"));
        assert_eq!(reloaded.user_identity(), Some(identity()));
    }

    #[test]
    fn test_file_storage_tolerates_corrupt_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").expect("write");

        let store = SessionStore::file(path);
        assert_eq!(store.access_token(), None);
    }
}
