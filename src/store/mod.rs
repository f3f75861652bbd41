use async_trait::async_trait;
use thiserror::Error;

pub mod file_store;
#[cfg(test)]
pub mod memory_store;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io failure: {0}")]
    Io(#[from] std::io::Error),
    #[error("stored payload is not valid json: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Process-wide string-keyed blob store. Writes replace the whole value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a key that does not exist is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
