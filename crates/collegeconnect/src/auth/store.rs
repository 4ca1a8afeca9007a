//! Durable credential storage.
//!
//! The credential lives in exactly one slot under [`CREDENTIAL_KEY`].
//! Reads are synchronous and never fail: an unreadable slot is treated as
//! empty. Clearing never fails either; problems are logged and the slot is
//! considered gone.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{Error, StorageError};

use super::BearerToken;

/// The fixed key the bearer credential is stored under.
pub const CREDENTIAL_KEY: &str = "jwtToken";

/// File name used by [`FileCredentialStore::in_dir`].
pub const CREDENTIAL_FILE: &str = "credentials.json";

/// A single durable slot holding the bearer credential.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read the stored credential, if any.
    fn load(&self) -> Option<BearerToken>;

    /// Persist a credential, replacing any previous one.
    fn save(&self, token: &BearerToken) -> Result<(), Error>;

    /// Delete the stored credential. Deleting an empty slot is a no-op.
    fn clear(&self);
}

/// In-process credential slot, for tests and short-lived front ends.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: Mutex<Option<BearerToken>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a credential.
    pub fn with_token(token: BearerToken) -> Self {
        Self {
            slot: Mutex::new(Some(token)),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Option<BearerToken> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, token: &BearerToken) -> Result<(), Error> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
        Ok(())
    }

    fn clear(&self) {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

/// Credential slot backed by a small JSON file: `{"jwtToken": "..."}`.
///
/// On Unix the file is created with mode 0600.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Use an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Use [`CREDENTIAL_FILE`] inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(CREDENTIAL_FILE))
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> Error {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
        .into()
    }

    fn read_entries(&self) -> Option<Map<String, Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read credential file");
                return None;
            }
        };

        match serde_json::from_str::<Map<String, Value>>(&contents) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable credential file");
                None
            }
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<BearerToken> {
        let entries = self.read_entries()?;
        let raw = entries.get(CREDENTIAL_KEY)?.as_str()?;
        match BearerToken::new(raw) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(error = %e, "Ignoring invalid stored credential");
                None
            }
        }
    }

    fn save(&self, token: &BearerToken) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let mut entries = Map::new();
        entries.insert(
            CREDENTIAL_KEY.to_string(),
            Value::String(token.as_str().to_string()),
        );
        let json = serde_json::to_string_pretty(&entries).map_err(StorageError::from)?;

        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        // Set restrictive permissions (Unix only)
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let mut perms = fs::metadata(&self.path)
                .map_err(|e| self.io_error(e))?
                .permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms).map_err(|e| self.io_error(e))?;
        }

        debug!(path = %self.path.display(), "Credential saved");
        Ok(())
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Credential removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to remove credential file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token(s: &str) -> BearerToken {
        BearerToken::new(s).unwrap()
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().is_none());

        store.save(&token("abc")).unwrap();
        assert_eq!(store.load(), Some(token("abc")));

        store.clear();
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_uses_fixed_key() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::in_dir(dir.path().join("nested"));

        store.save(&token("xyz")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let json: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[CREDENTIAL_KEY], "xyz");
        assert_eq!(store.load(), Some(token("xyz")));
    }

    #[test]
    fn file_store_clear_removes_file() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());

        store.save(&token("xyz")).unwrap();
        store.clear();

        assert!(!store.path().exists());
        assert!(store.load().is_none());
        // Clearing again is a no-op.
        store.clear();
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_none());

        fs::write(store.path(), r#"{"jwtToken": ""}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn file_store_restricts_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileCredentialStore::in_dir(dir.path());
        store.save(&token("abc")).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
