//! Persistent key-value storage for the document and the theme.
//!
//! Two keys are used, [`CONTENT_KEY`] and [`THEME_KEY`]. Each write replaces
//! the previous value (last write wins); the two keys are written
//! independently and there is no transaction between them.
//!
//! [`FileStore`] keeps every entry in one JSON object on disk:
//!
//! ```text
//! { "content": "# 제목\n...", "theme": "dark" }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use thiserror::Error;

pub const CONTENT_KEY: &str = "content";
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access store {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store {} is not a JSON object of strings: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode store: {0}")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed, string-valued persistent store.
pub trait KeyValueStore: std::fmt::Debug {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and for running without a writable home.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// Entries are loaded once on open and the whole object is rewritten on
/// every `set`.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open a store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), keys = entries.len(), "opened store");
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.entries.get(key).is_some_and(|v| v == value) {
            return Ok(());
        }
        self.entries.insert(key.to_string(), value.to_string());
        self.flush()
    }
}
