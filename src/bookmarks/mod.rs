//! The "My List" bookmark store.

mod storage;

pub use storage::{ListStorage, MemoryStorage, TomlFileStorage};

use std::sync::{Mutex, MutexGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::{MovieSummary, SeriesSummary, image_url};
use crate::config::bookmarks_path;
use crate::error::{BookmarkError, Result, StorageError};

/// A saved title. Identity is the exact, case-sensitive `title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub title: String,
    pub overview: String,
    #[serde(rename = "imagePath")]
    pub image_path: String,
}

impl Bookmark {
    pub fn new(
        title: impl Into<String>,
        overview: impl Into<String>,
        image_path: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            overview: overview.into(),
            image_path: image_path.into(),
        }
    }

    /// Uses the backdrop, falling back to the poster, then to an empty path.
    pub fn from_movie(movie: &MovieSummary) -> Self {
        Self::new(
            &movie.title,
            &movie.overview,
            preferred_image(&movie.backdrop_path, &movie.poster_path),
        )
    }

    pub fn from_series(series: &SeriesSummary) -> Self {
        Self::new(
            &series.name,
            &series.overview,
            preferred_image(&series.backdrop_path, &series.poster_path),
        )
    }

    pub fn image_url(&self, image_base: &str) -> Option<String> {
        image_url(image_base, Some(&self.image_path))
    }
}

fn preferred_image(backdrop: &Option<String>, poster: &Option<String>) -> String {
    backdrop
        .as_deref()
        .filter(|p| !p.is_empty())
        .or(poster.as_deref())
        .unwrap_or_default()
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

struct Inner<S> {
    storage: S,
    items: Vec<Bookmark>,
}

/// Owns the persisted list. Every mutation runs its read-modify-persist
/// sequence under one lock and rewrites the durable record before returning;
/// the in-memory list only changes once the write has succeeded.
pub struct BookmarkStore<S: ListStorage> {
    inner: Mutex<Inner<S>>,
}

impl BookmarkStore<TomlFileStorage> {
    /// Open the list file in the platform data directory.
    pub fn open_default() -> Result<Self> {
        let storage = TomlFileStorage::new(bookmarks_path()?);
        Ok(Self::open(storage)?)
    }
}

impl<S: ListStorage> BookmarkStore<S> {
    pub fn open(storage: S) -> std::result::Result<Self, StorageError> {
        let items = storage.load()?;
        debug!(count = items.len(), "Loaded bookmarks");

        Ok(Self {
            inner: Mutex::new(Inner { storage, items }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner<S>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the list as last persisted.
    pub fn list(&self) -> Vec<Bookmark> {
        self.lock().items.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, title: &str) -> bool {
        self.lock().items.iter().any(|b| b.title == title)
    }

    pub fn add(&self, bookmark: Bookmark) -> std::result::Result<AddOutcome, BookmarkError> {
        let mut inner = self.lock();

        if inner.items.iter().any(|b| b.title == bookmark.title) {
            debug!(title = %bookmark.title, "Already in list");
            return Ok(AddOutcome::AlreadyExists);
        }

        let mut updated = inner.items.clone();
        updated.push(bookmark);
        inner.storage.save(&updated)?;

        if let Some(added) = updated.last() {
            info!(title = %added.title, count = updated.len(), "Added to list");
        }
        inner.items = updated;
        Ok(AddOutcome::Added)
    }

    pub fn remove(&self, index: usize) -> std::result::Result<Bookmark, BookmarkError> {
        let mut inner = self.lock();

        let len = inner.items.len();
        if index >= len {
            return Err(BookmarkError::IndexOutOfRange { index, len });
        }

        let mut updated = inner.items.clone();
        let removed = updated.remove(index);
        inner.storage.save(&updated)?;

        info!(title = %removed.title, count = updated.len(), "Removed from list");
        inner.items = updated;
        Ok(removed)
    }

    /// Re-read the durable record, picking up changes made outside this store.
    pub fn reload(&self) -> std::result::Result<(), StorageError> {
        let mut inner = self.lock();
        let items = inner.storage.load()?;
        inner.items = items;
        Ok(())
    }
}

impl<S: ListStorage> std::fmt::Debug for BookmarkStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookmarkStore")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    struct FailingStorage;

    impl ListStorage for FailingStorage {
        fn load(&self) -> std::result::Result<Vec<Bookmark>, StorageError> {
            Ok(vec![Bookmark::new("Heat", "", "")])
        }

        fn save(&self, _bookmarks: &[Bookmark]) -> std::result::Result<(), StorageError> {
            Err(StorageError::Io {
                path: "/readonly".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn dune() -> Bookmark {
        Bookmark::new("Dune", "Spice.", "/dune.jpg")
    }

    #[test]
    fn test_add_twice_keeps_one() {
        let storage = MemoryStorage::new();
        let store = BookmarkStore::open(storage.clone()).unwrap();

        assert_eq!(store.add(dune()).unwrap(), AddOutcome::Added);
        assert_eq!(store.add(dune()).unwrap(), AddOutcome::AlreadyExists);

        let list = store.list();
        assert_eq!(list.iter().filter(|b| b.title == "Dune").count(), 1);
        assert_eq!(storage.snapshot(), list);
    }

    #[test]
    fn test_title_match_is_exact() {
        let store = BookmarkStore::open(MemoryStorage::new()).unwrap();
        store.add(dune()).unwrap();

        assert_eq!(
            store.add(Bookmark::new("dune", "", "")).unwrap(),
            AddOutcome::Added
        );
        // Same title, different details still collides.
        assert_eq!(
            store.add(Bookmark::new("Dune", "other", "/x.jpg")).unwrap(),
            AddOutcome::AlreadyExists
        );
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_remove() {
        let store = BookmarkStore::open(MemoryStorage::new()).unwrap();
        store.add(dune()).unwrap();

        assert_eq!(store.remove(0).unwrap(), dune());
        assert!(store.list().is_empty());

        assert!(matches!(
            store.remove(0),
            Err(BookmarkError::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_remove_keeps_order() {
        let storage = MemoryStorage::with_bookmarks(
            ["A", "B", "C"]
                .into_iter()
                .map(|title| Bookmark::new(title, "", ""))
                .collect(),
        );
        let store = BookmarkStore::open(storage.clone()).unwrap();
        assert_eq!(store.len(), 3);

        store.remove(1).unwrap();
        let titles: Vec<_> = storage.snapshot().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert!(matches!(
            store.remove(2),
            Err(BookmarkError::IndexOutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_failed_persist_leaves_list_untouched() {
        let store = BookmarkStore::open(FailingStorage).unwrap();

        assert!(matches!(store.add(dune()), Err(BookmarkError::Storage(_))));
        assert!(matches!(store.remove(0), Err(BookmarkError::Storage(_))));
        assert_eq!(store.list(), vec![Bookmark::new("Heat", "", "")]);
    }

    #[test]
    fn test_reopen_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("listed_movies.toml");

        let store = BookmarkStore::open(TomlFileStorage::new(&path)).unwrap();
        store.add(dune()).unwrap();
        store.add(Bookmark::new("Heat", "", "")).unwrap();
        drop(store);

        let reopened = BookmarkStore::open(TomlFileStorage::new(&path)).unwrap();
        let titles: Vec<_> = reopened.list().into_iter().map(|b| b.title).collect();
        assert_eq!(titles, vec!["Dune", "Heat"]);
    }

    #[test]
    fn test_reload_sees_external_writes() {
        let storage = MemoryStorage::new();
        let store = BookmarkStore::open(storage.clone()).unwrap();

        storage.save(&[dune()]).unwrap();
        assert!(store.is_empty());
        store.reload().unwrap();
        assert!(store.contains("Dune"));
    }

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let storage = MemoryStorage::new();
        let store = Arc::new(BookmarkStore::open(storage.clone()).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .add(Bookmark::new(format!("{t}-{i}"), "", ""))
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 200);
        assert_eq!(storage.snapshot().len(), 200);
    }

    #[test]
    fn test_from_movie_prefers_backdrop() {
        let mut movie = MovieSummary {
            id: 1,
            title: "Dune".to_string(),
            overview: "Spice.".to_string(),
            poster_path: Some("/poster.jpg".to_string()),
            backdrop_path: Some("/backdrop.jpg".to_string()),
            vote_average: 7.8,
            release_date: "2021-09-15".to_string(),
        };
        assert_eq!(Bookmark::from_movie(&movie).image_path, "/backdrop.jpg");

        movie.backdrop_path = None;
        assert_eq!(Bookmark::from_movie(&movie).image_path, "/poster.jpg");

        movie.poster_path = None;
        let bookmark = Bookmark::from_movie(&movie);
        assert_eq!(bookmark.image_path, "");
        assert_eq!(bookmark.image_url("https://image.tmdb.org/t/p/w500"), None);
    }

    #[test]
    fn test_from_series_uses_name() {
        let series = SeriesSummary {
            id: 2,
            name: "Severance".to_string(),
            overview: "Work.".to_string(),
            poster_path: Some("/s.jpg".to_string()),
            backdrop_path: None,
            vote_average: 8.3,
            first_air_date: "2022-02-18".to_string(),
        };
        let bookmark = Bookmark::from_series(&series);
        assert_eq!(bookmark.title, "Severance");
        assert_eq!(
            bookmark.image_url("https://image.tmdb.org/t/p/w500").as_deref(),
            Some("https://image.tmdb.org/t/p/w500/s.jpg")
        );
    }
}
