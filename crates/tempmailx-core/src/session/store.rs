//! Persistent mirror of the active session.
//!
//! The store is written wholesale on every session change and read once at
//! startup. It is never consulted to resolve conflicts: the controller owns
//! the session, the store only mirrors it.
//!
//! The session is kept as two named entries, `account` (account plus
//! password) and `token`, each an opaque JSON document. A missing entry
//! means there is no session.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use keyring::Entry;
use tempmailx_api::Token;
use tracing::{debug, warn};

use super::model::{Session, StoredAccount};

/// Service name used for keyring entries.
pub const SERVICE_NAME: &str = "tempmailx";

/// Entry holding the serialized account and password.
const ACCOUNT_ENTRY: &str = "account";

/// Entry holding the serialized token.
const TOKEN_ENTRY: &str = "token";

/// Error type for session store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stored entry is not valid JSON for its type.
    #[error("Corrupt session entry: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Persistence for the active session.
pub trait SessionStore: Send + Sync {
    /// Loads the stored session, if both entries are present.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry exists but cannot be read or parsed.
    fn load(&self) -> StoreResult<Option<Session>>;

    /// Overwrites both entries.
    ///
    /// # Errors
    ///
    /// Returns an error if an entry cannot be written.
    fn save(&self, account: &StoredAccount, token: &Token) -> StoreResult<()>;

    /// Removes both entries. Missing entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing entry cannot be removed.
    fn clear(&self) -> StoreResult<()>;
}

impl<T: SessionStore + ?Sized> SessionStore for Box<T> {
    fn load(&self) -> StoreResult<Option<Session>> {
        (**self).load()
    }

    fn save(&self, account: &StoredAccount, token: &Token) -> StoreResult<()> {
        (**self).save(account, token)
    }

    fn clear(&self) -> StoreResult<()> {
        (**self).clear()
    }
}

/// Store backed by two JSON files in a directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    /// Creates a store rooted at `dir`. The directory is created on save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the directory holding the entries.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, entry: &str) -> PathBuf {
        self.dir.join(format!("{entry}.json"))
    }

    fn read(&self, entry: &str) -> StoreResult<Option<String>> {
        match fs::read_to_string(self.path(entry)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn remove(&self, entry: &str) -> StoreResult<()> {
        match fs::remove_file(self.path(entry)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> StoreResult<Option<Session>> {
        let (Some(account), Some(token)) = (self.read(ACCOUNT_ENTRY)?, self.read(TOKEN_ENTRY)?)
        else {
            debug!("No stored session in {}", self.dir.display());
            return Ok(None);
        };
        Ok(Some(Session::new(
            serde_json::from_str(&account)?,
            serde_json::from_str(&token)?,
        )))
    }

    fn save(&self, account: &StoredAccount, token: &Token) -> StoreResult<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.path(ACCOUNT_ENTRY),
            serde_json::to_string_pretty(account)?,
        )?;
        fs::write(self.path(TOKEN_ENTRY), serde_json::to_string_pretty(token)?)?;
        debug!("Saved session for {} to {}", account.address(), self.dir.display());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.remove(ACCOUNT_ENTRY)?;
        self.remove(TOKEN_ENTRY)?;
        debug!("Cleared stored session in {}", self.dir.display());
        Ok(())
    }
}

/// Store backed by the system keyring.
///
/// - Linux: Secret Service (GNOME Keyring, `KWallet`)
/// - macOS: Keychain
/// - Windows: Credential Manager
#[derive(Debug, Clone)]
pub struct KeyringSessionStore {
    service: String,
}

impl Default for KeyringSessionStore {
    fn default() -> Self {
        Self::new(SERVICE_NAME)
    }
}

impl KeyringSessionStore {
    /// Creates a store using `service` as the keyring service name.
    #[must_use]
    pub fn new(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn read(&self, entry: &str) -> StoreResult<Option<String>> {
        match Entry::new(&self.service, entry)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, entry: &str, value: &str) -> StoreResult<()> {
        Entry::new(&self.service, entry)?.set_password(value)?;
        Ok(())
    }

    fn remove(&self, entry: &str) -> StoreResult<()> {
        match Entry::new(&self.service, entry)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!("Failed to delete keyring entry {entry}: {e}");
                Err(e.into())
            }
        }
    }
}

impl SessionStore for KeyringSessionStore {
    fn load(&self) -> StoreResult<Option<Session>> {
        let (Some(account), Some(token)) = (self.read(ACCOUNT_ENTRY)?, self.read(TOKEN_ENTRY)?)
        else {
            debug!("No stored session in keyring service {}", self.service);
            return Ok(None);
        };
        Ok(Some(Session::new(
            serde_json::from_str(&account)?,
            serde_json::from_str(&token)?,
        )))
    }

    fn save(&self, account: &StoredAccount, token: &Token) -> StoreResult<()> {
        self.write(ACCOUNT_ENTRY, &serde_json::to_string(account)?)?;
        self.write(TOKEN_ENTRY, &serde_json::to_string(token)?)?;
        debug!("Stored session for {} in keyring", account.address());
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.remove(ACCOUNT_ENTRY)?;
        self.remove(TOKEN_ENTRY)
    }
}

/// Process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `session`.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    /// Returns a copy of what is currently stored.
    #[must_use]
    pub fn stored(&self) -> Option<Session> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> StoreResult<Option<Session>> {
        Ok(self.stored())
    }

    fn save(&self, account: &StoredAccount, token: &Token) -> StoreResult<()> {
        *self.lock() = Some(Session::new(account.clone(), token.clone()));
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        *self.lock() = None;
        Ok(())
    }
}
