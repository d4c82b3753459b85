//! File-backed wishlist store.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use shared::Category;

/// A liked catalog item. Uniqueness key is `(id, category)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistEntry {
    pub id: u32,
    pub category: Category,
    pub title: String,
    pub image_url: String,
}

/// Wishlist persistence failures.
///
/// Surfaced explicitly so callers can tell an empty wishlist from a
/// corrupted one; a missing file is not an error.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access wishlist file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("wishlist file {path} is corrupted: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable local set of liked items, stored as one JSON array in a
/// single file.
///
/// Each instance is constructed over an explicit path, so tests and
/// embedders get isolated stores. Access is expected to be
/// single-process; there is no cross-process locking.
#[derive(Debug, Clone)]
pub struct WishlistStore {
    path: PathBuf,
}

impl WishlistStore {
    /// Create a store over the given wishlist file.
    ///
    /// The file is created lazily on the first mutation.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// All entries in insertion order. A missing file is an empty list.
    pub fn list(&self) -> Result<Vec<WishlistEntry>, StorageError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No wishlist file yet, treating as empty");
            return Ok(Vec::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "Failed to read wishlist");
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        })?;

        serde_json::from_str(&content).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "Wishlist file is corrupted");
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Add an entry. Returns false (and leaves the file untouched) when
    /// `(id, category)` is already present.
    pub fn add(&self, entry: WishlistEntry) -> Result<bool, StorageError> {
        let mut entries = self.list()?;

        if entries
            .iter()
            .any(|e| e.id == entry.id && e.category == entry.category)
        {
            return Ok(false);
        }

        debug!(id = entry.id, category = %entry.category, "Adding wishlist entry");
        entries.push(entry);
        self.save(&entries)?;
        Ok(true)
    }

    /// Remove the entry keyed by `(id, category)`. Returns false when no
    /// such entry exists.
    pub fn remove(&self, id: u32, category: Category) -> Result<bool, StorageError> {
        let mut entries = self.list()?;
        let initial_len = entries.len();

        entries.retain(|e| !(e.id == id && e.category == category));
        if entries.len() == initial_len {
            return Ok(false);
        }

        debug!(id, category = %category, "Removed wishlist entry");
        self.save(&entries)?;
        Ok(true)
    }

    /// Whether `(id, category)` is in the wishlist.
    pub fn contains(&self, id: u32, category: Category) -> Result<bool, StorageError> {
        let entries = self.list()?;
        Ok(entries
            .iter()
            .any(|e| e.id == id && e.category == category))
    }

    /// Remove all entries of one category, keeping the other.
    pub fn clear(&self, category: Category) -> Result<(), StorageError> {
        let mut entries = self.list()?;
        entries.retain(|e| e.category != category);
        self.save(&entries)
    }

    /// Remove the entire wishlist.
    pub fn clear_all(&self) -> Result<(), StorageError> {
        if !self.path.exists() {
            return Ok(());
        }
        std::fs::remove_file(&self.path).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "Failed to clear wishlist");
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }

    /// Rewrite the whole blob.
    fn save(&self, entries: &[WishlistEntry]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }

        let content = serde_json::to_string_pretty(entries).map_err(|source| {
            StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }
        })?;

        std::fs::write(&self.path, content).map_err(|source| {
            warn!(path = %self.path.display(), error = %source, "Failed to write wishlist");
            StorageError::Io {
                path: self.path.clone(),
                source,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(id: u32, category: Category) -> WishlistEntry {
        WishlistEntry {
            id,
            category,
            title: format!("title-{id}"),
            image_url: format!("https://cdn.example/images/{id}.jpg"),
        }
    }

    fn test_store(dir: &TempDir) -> WishlistStore {
        WishlistStore::new(dir.path().join("wishlist.json"))
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        assert_eq!(store.list().unwrap(), Vec::new());
        assert!(!store.contains(1, Category::Anime).unwrap());
    }

    #[test]
    fn test_add_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        assert!(store.add(entry(20, Category::Anime)).unwrap());
        let entries = store.list().unwrap();
        assert_eq!(entries, vec![entry(20, Category::Anime)]);
        assert!(store.contains(20, Category::Anime).unwrap());

        assert!(store.remove(20, Category::Anime).unwrap());
        assert!(store.list().unwrap().is_empty());
        assert!(!store.contains(20, Category::Anime).unwrap());
    }

    #[test]
    fn test_add_is_idempotent_per_key() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        assert!(store.add(entry(20, Category::Anime)).unwrap());
        assert!(!store.add(entry(20, Category::Anime)).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);

        // Same id under the other category is a distinct key
        assert!(store.add(entry(20, Category::Manga)).unwrap());
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.add(entry(1, Category::Anime)).unwrap();
        assert!(!store.remove(2, Category::Anime).unwrap());
        assert!(!store.remove(1, Category::Manga).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn test_clear_keeps_other_category() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.add(entry(1, Category::Anime)).unwrap();
        store.add(entry(2, Category::Anime)).unwrap();
        store.add(entry(3, Category::Manga)).unwrap();

        store.clear(Category::Anime).unwrap();
        let entries = store.list().unwrap();
        assert_eq!(entries, vec![entry(3, Category::Manga)]);
    }

    #[test]
    fn test_clear_all() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store.add(entry(1, Category::Anime)).unwrap();
        store.clear_all().unwrap();
        assert!(store.list().unwrap().is_empty());

        // Clearing an already-empty store is fine
        store.clear_all().unwrap();
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        for id in [5, 3, 9] {
            store.add(entry(id, Category::Anime)).unwrap();
        }
        let ids: Vec<u32> = store.list().unwrap().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![5, 3, 9]);
    }

    #[test]
    fn test_corrupt_blob_is_distinguishable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wishlist.json");
        std::fs::write(&path, "{ not json at all").unwrap();

        let store = WishlistStore::new(&path);
        assert!(matches!(store.list(), Err(StorageError::Corrupt { .. })));
        // Mutations refuse to clobber a corrupt blob
        assert!(matches!(
            store.add(entry(1, Category::Anime)),
            Err(StorageError::Corrupt { .. })
        ));
        // But a full clear recovers
        store.clear_all().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = WishlistStore::new(dir.path().join("nested/dir/wishlist.json"));

        assert!(store.add(entry(1, Category::Manga)).unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }
}
