use std::{io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::trace;

use super::{KeyValueStore, StorageError};

/// Keeps every key in its own file below `root`.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FileStore { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let key_is_plain = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !key_is_plain {
            return Err(StorageError::Unavailable(format!(
                "refusing to map key '{}' to a file",
                key
            )));
        }
        Ok(self.root.join(key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.root).await?;
        // write next to the target and rename so readers never see half a payload
        let staging = path.with_extension("tmp");
        fs::write(&staging, value).await?;
        fs::rename(&staging, &path).await?;
        trace!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        assert_eq!(store.get("etf_summary_data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_returns_latest_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));

        store.set("etf_prices_timestamp", "1000").await.unwrap();
        store.set("etf_prices_timestamp", "2000").await.unwrap();

        assert_eq!(
            store.get("etf_prices_timestamp").await.unwrap().as_deref(),
            Some("2000")
        );
        assert!(dir.path().join("nested").join("etf_prices_timestamp").exists());
    }

    #[tokio::test]
    async fn removing_absent_key_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        store.remove("etf_prices_data").await.unwrap();
        store.set("etf_prices_data", "{}").await.unwrap();
        store.remove("etf_prices_data").await.unwrap();

        assert_eq!(store.get("etf_prices_data").await.unwrap(), None);
    }

    #[tokio::test]
    async fn path_like_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());

        let result = store.set("../escape", "x").await;
        assert!(matches!(result, Err(StorageError::Unavailable(_))));
    }

    #[tokio::test]
    async fn unreadable_root_surfaces_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // a regular file where the store expects a directory
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();
        let store = FileStore::new(&blocker);

        assert!(matches!(
            store.set("etf_summary_data", "[]").await,
            Err(StorageError::Io(_))
        ));
        assert!(matches!(
            store.get("etf_summary_data").await,
            Err(StorageError::Io(_))
        ));
    }
}
