use async_trait::async_trait;

use std::{
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    sync::RwLock,
};

use crate::error::StorageError;

/// Key of the cached notes snapshot.
pub const NOTES_KEY: &str = "notenest_notes";
/// Key of the cached categories snapshot.
pub const CATEGORIES_KEY: &str = "notenest_categories";

/// String key-value storage surviving client restarts.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// Stores every key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl LocalStorage for FileStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        // Readers only ever see a complete snapshot.
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        tokio::fs::write(&tmp, value).await?;
        tokio::fs::rename(&tmp, self.path(key)).await?;

        Ok(())
    }
}

/// Process-local storage, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self
            .items
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.items
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_storage_round_trips_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("cache"));

        assert_eq!(storage.get_item(NOTES_KEY).await.unwrap(), None);

        storage.set_item(NOTES_KEY, "[1]".to_string()).await.unwrap();
        storage.set_item(NOTES_KEY, "[2]".to_string()).await.unwrap();

        assert_eq!(
            storage.get_item(NOTES_KEY).await.unwrap().as_deref(),
            Some("[2]")
        );
        assert_eq!(storage.get_item(CATEGORIES_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn memory_storage_keeps_keys_apart() {
        let storage = MemoryStorage::new();

        storage.set_item(NOTES_KEY, "notes".to_string()).await.unwrap();
        storage
            .set_item(CATEGORIES_KEY, "categories".to_string())
            .await
            .unwrap();

        assert_eq!(
            storage.get_item(NOTES_KEY).await.unwrap().as_deref(),
            Some("notes")
        );
        assert_eq!(
            storage.get_item(CATEGORIES_KEY).await.unwrap().as_deref(),
            Some("categories")
        );
    }
}
