//! Persisted session state.
//!
//! Two values survive a process restart: the access token and the last
//! selected organization id. [`SessionStore`] abstracts where they live;
//! [`MemoryStore`] keeps them in process (tests, ephemeral sessions) and
//! [`FileStore`] keeps them in a single JSON document under the user's
//! home directory.
//!
//! Writers are disjoint: the session manager owns the token key, the
//! tenancy selector owns the organization key.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::warn;

use crate::error::{SessionError, SessionResult};

/// Store key for the persisted access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Store key for the persisted organization selection.
pub const SELECTED_ORG_KEY: &str = "selected_organization_id";

/// Key-value persistence for session state.
///
/// Implementations must tolerate concurrent calls; values are small
/// strings and operations are expected to be quick and local.
pub trait SessionStore: Send + Sync {
    /// Read a value, `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> SessionResult<()>;

    /// Remove a value. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> SessionResult<()>;
}

/// In-memory store for tests and sessions that should not persist.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SessionError::Store("store lock poisoned".to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| SessionError::Store("store lock poisoned".to_string()))?;
        values.remove(key);
        Ok(())
    }
}

/// File-backed store holding one JSON document.
///
/// The parent directory is created `0700` and the file written `0600`
/// on Unix; the document holds bearer credentials. An unreadable or
/// corrupt file is treated as empty rather than failing the session.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The conventional location, `~/.fundops/session`.
    ///
    /// # Returns
    ///
    /// `None` when no home directory can be resolved.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".fundops").join("session"))
    }

    /// Create a store at the conventional location.
    pub fn from_home() -> Option<Self> {
        Self::default_path().map(Self::new)
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> HashMap<String, String> {
        let Ok(raw) = fs::read_to_string(&self.path) else {
            return HashMap::new();
        };
        match serde_json::from_str(&raw) {
            Ok(document) => document,
            Err(error) => {
                warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    error
                );
                HashMap::new()
            }
        }
    }

    fn write_document(&self, document: &HashMap<String, String>) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SessionError::Store(format!("mkdir {}: {}", parent.display(), e))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    warn!("Failed to chmod 0700 {}: {}", parent.display(), e);
                }
            }
        }

        let raw = serde_json::to_string(document).map_err(|e| SessionError::Store(e.to_string()))?;
        fs::write(&self.path, raw)
            .map_err(|e| SessionError::Store(format!("write {}: {}", self.path.display(), e)))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| SessionError::Store(format!("chmod {}: {}", self.path.display(), e)))?;
        }

        Ok(())
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut document = self.read_document();
        document.remove(key)
    }

    fn set(&self, key: &str, value: &str) -> SessionResult<()> {
        let mut document = self.read_document();
        document.insert(key.to_string(), value.to_string());
        self.write_document(&document)
    }

    fn remove(&self, key: &str) -> SessionResult<()> {
        let mut document = self.read_document();
        if document.remove(key).is_none() {
            return Ok(());
        }
        self.write_document(&document)
    }
}
