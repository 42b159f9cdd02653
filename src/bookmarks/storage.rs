use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use super::Bookmark;
use crate::error::StorageError;

/// Whole-value durable record holding the ordered bookmark list.
pub trait ListStorage: Send {
    fn load(&self) -> Result<Vec<Bookmark>, StorageError>;
    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError>;
}

/// On-disk layout of the list file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ListFile {
    #[serde(default)]
    movies: Vec<Bookmark>,
}

/// TOML file storage. Writes go to a sibling temp file that then replaces
/// the target, so readers never see a half-written list.
#[derive(Debug, Clone)]
pub struct TomlFileStorage {
    path: PathBuf,
}

impl TomlFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ListStorage for TomlFileStorage {
    fn load(&self) -> Result<Vec<Bookmark>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })?;
        let file: ListFile = toml::from_str(&content)?;
        Ok(file.movies)
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|e| StorageError::Io {
            path: parent.clone(),
            source: e,
        })?;

        let content = toml::to_string_pretty(&ListFile {
            movies: bookmarks.to_vec(),
        })?;

        let io_err = |e| StorageError::Io {
            path: parent.clone(),
            source: e,
        };
        let mut tmp = NamedTempFile::new_in(&parent).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;

        tmp.persist(&self.path).map_err(|e| StorageError::Persist {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }
}

/// In-memory storage. Clones share the same record, which lets a caller keep
/// a handle to inspect what a store has persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    record: Arc<Mutex<Vec<Bookmark>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bookmarks(bookmarks: Vec<Bookmark>) -> Self {
        Self {
            record: Arc::new(Mutex::new(bookmarks)),
        }
    }

    pub fn snapshot(&self) -> Vec<Bookmark> {
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ListStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Bookmark>, StorageError> {
        Ok(self.snapshot())
    }

    fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        *self
            .record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = bookmarks.to_vec();
        Ok(())
    }
}
