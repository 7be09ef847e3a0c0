use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::error::StorageError;

/// Key under which the favorited translation is kept.
pub const FAVORITE_KEY: &str = "favoriteTranslation";

/// String key/value store persisted as a single JSON object file, playing
/// the role browser local storage plays for a page.
pub struct LocalStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl LocalStore {
    /// Open the store, creating parent directories. A missing file is an
    /// empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Opened local store {} with {} keys", path.display(), entries.len());

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    /// Remove the key. Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    /// Apply `change` to a copy of the entries and keep the copy only once it
    /// is on disk. `change` returns whether anything changed.
    fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let mut next = entries.clone();
        if !change(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// The single favorite-translation slot
pub struct FavoriteStore {
    store: LocalStore,
}

impl FavoriteStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        Ok(Self {
            store: LocalStore::open(path)?,
        })
    }

    pub fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.store.get(FAVORITE_KEY))
    }

    /// Overwrite the favorite with `translation`, stored verbatim.
    pub fn save(&self, translation: &str) -> Result<(), StorageError> {
        debug!("Saving favorite translation");
        self.store.set(FAVORITE_KEY, translation)
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        debug!("Removing favorite translation");
        self.store.remove(FAVORITE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn favorite_is_stored_under_its_key_and_removed_entirely() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local_storage.json");
        let favorites = FavoriteStore::open(&path).unwrap();

        favorites.save("नमस्ते").unwrap();
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk[FAVORITE_KEY], "नमस्ते");

        favorites.clear().unwrap();
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk.get(FAVORITE_KEY).is_none());
        assert_eq!(favorites.load().unwrap(), None);
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");

        LocalStore::open(&path).unwrap().set(FAVORITE_KEY, "first").unwrap();
        let favorites = FavoriteStore::open(&path).unwrap();
        assert_eq!(favorites.load().unwrap().as_deref(), Some("first"));

        favorites.save("second").unwrap();
        assert_eq!(FavoriteStore::open(&path).unwrap().load().unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn other_keys_are_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, r#"{"theme": "dark"}"#).unwrap();

        let favorites = FavoriteStore::open(&path).unwrap();
        favorites.save("x").unwrap();
        favorites.clear().unwrap();

        let store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        let favorites = FavoriteStore::open(&path).unwrap();

        // A directory in place of the file makes every write fail.
        fs::create_dir(&path).unwrap();
        assert!(matches!(favorites.save("ghost"), Err(StorageError::Io(_))));
        assert_eq!(favorites.load().unwrap(), None);
    }

    #[test]
    fn failed_removal_keeps_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        let favorites = FavoriteStore::open(&path).unwrap();
        favorites.save("kept").unwrap();

        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        assert!(favorites.clear().is_err());
        assert_eq!(favorites.load().unwrap().as_deref(), Some("kept"));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local_storage.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(LocalStore::open(&path), Err(StorageError::Corrupt(_))));
    }
}
