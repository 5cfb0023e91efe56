use log::debug;
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use super::StoreError;

/// String key/value storage with whole-value reads and writes
pub trait KeyValueStorage {
    /// Stored value for `key`, `None` when nothing was ever written
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value for `key`
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-process storage, lost when dropped
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a raw value
    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Directory-backed storage, one file per key.
///
/// Values are written to a temporary file in the same directory and then
/// renamed over the target, so a reader sees either the old or the new value.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Open (and create if needed) a storage directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            debug!("Creating storage directory {}", dir.display());
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;

        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }
}
