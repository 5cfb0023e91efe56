// Local persistence for registered users.
// The collection is a single JSON array stored under one key of a
// key/value backend and is always rewritten as a whole.

use log::{debug, info, warn};
use serde_json::Value;

mod backend;
pub mod models;

pub use backend::{FileStorage, KeyValueStorage, MemoryStorage};
pub use models::UserRecord;

use crate::config::Config;

/// Storage key of the users collection
pub const USERS_KEY: &str = "users";

/// Storage error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize users: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Persisted collection of registered users
#[cfg_attr(test, mockall::automock)]
pub trait RegistrationStore {
    /// All readable users in insertion order
    fn list_users(&self) -> Vec<UserRecord>;

    /// True iff a stored user has exactly this email
    fn email_exists(&self, email: &str) -> bool {
        self.list_users().iter().any(|user| user.email == email)
    }

    /// Append a user and rewrite the whole collection
    fn append(&mut self, record: UserRecord) -> Result<(), StoreError>;
}

/// `RegistrationStore` over any key/value backend
#[derive(Debug, Clone)]
pub struct LocalRegistrationStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> LocalRegistrationStore<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, USERS_KEY)
    }

    pub fn with_key(storage: S, key: &str) -> Self {
        Self {
            storage,
            key: key.to_string(),
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl LocalRegistrationStore<FileStorage> {
    /// File-backed store at the configured data directory
    pub fn from_config(config: &Config) -> Result<Self, StoreError> {
        let storage = FileStorage::open(&config.storage.data_dir)?;
        Ok(Self::with_key(storage, &config.storage.users_key))
    }
}

impl<S: KeyValueStorage> LocalRegistrationStore<S> {
    /// Stored array as raw JSON elements; anything that is not an array reads as empty
    fn read_entries(&self) -> Vec<Value> {
        let raw = match self.storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read users from storage, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => entries,
            Ok(_) => {
                warn!("Stored users are not a JSON array, treating as empty");
                Vec::new()
            }
            Err(e) => {
                warn!("Stored users are corrupt, treating as empty: {}", e);
                Vec::new()
            }
        }
    }
}

impl<S: KeyValueStorage> RegistrationStore for LocalRegistrationStore<S> {
    fn list_users(&self) -> Vec<UserRecord> {
        self.read_entries()
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<UserRecord>(entry) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!("Skipping unreadable user entry {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    // Incomplete entries still count; only their email string is compared
    fn email_exists(&self, email: &str) -> bool {
        self.read_entries()
            .iter()
            .any(|entry| entry.get("email").and_then(Value::as_str) == Some(email))
    }

    fn append(&mut self, record: UserRecord) -> Result<(), StoreError> {
        let mut entries = self.read_entries();
        debug!("Appending user {} to {} existing", record.email, entries.len());

        // Existing entries are written back untouched, readable or not
        entries.push(serde_json::to_value(&record)?);
        let serialized = serde_json::to_string(&entries)?;
        self.storage.set_item(&self.key, &serialized)?;

        info!("Users collection now holds {} record(s)", entries.len());
        Ok(())
    }
}
