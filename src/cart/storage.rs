use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CartStorageError {
    #[error("Cart storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable key-value storage for serialized cart state.
pub trait CartStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError>;
    fn write(&self, key: &str, value: &str) -> Result<(), CartStorageError>;
}

/// One `<key>.json` file per entry inside a directory.
#[derive(Debug, Clone)]
pub struct FileCartStorage {
    dir: PathBuf,
}

impl FileCartStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl CartStorage for FileCartStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CartStorageError> {
        fs::create_dir_all(&self.dir)?;
        // Write beside the target and rename over it so readers never see a
        // half-written file.
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// Process-local storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCartStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryCartStorage {
    fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), CartStorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
