// src/db/session.rs
use std::{collections::HashMap, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::service::error::ServiceError;

/// Durable key/value storage for the signed-in session, modelled on a
/// browser's local storage: string keys, string values.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError>;

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError>;

    async fn remove_item(&self, key: &str) -> Result<(), ServiceError>;
}

/// Keeps every key in a single JSON object on disk.
#[derive(Debug)]
pub struct FileSessionStorage {
    path: PathBuf,
    // Serialises read-modify-write cycles on the file.
    lock: Mutex<()>,
}

impl FileSessionStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStorage {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// A file that is not a JSON object of strings is reset to `{}`.
    /// Callers must hold `lock`.
    async fn load(&self) -> Result<HashMap<String, String>, ServiceError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => return Ok(HashMap::new()),
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_slice(&bytes) {
            Ok(items) => Ok(items),
            Err(e) => {
                tracing::warn!(
                    "Session file {} is corrupt ({}), resetting it",
                    self.path.display(),
                    e
                );
                let items = HashMap::new();
                self.store(&items).await?;
                Ok(items)
            }
        }
    }

    async fn store(&self, items: &HashMap<String, String>) -> Result<(), ServiceError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        items.insert(key.to_string(), value);
        self.store(&items).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), ServiceError> {
        let _guard = self.lock.lock().await;
        let mut items = self.load().await?;
        if items.remove(key).is_some() {
            self.store(&items).await?;
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.items.lock().await.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.items.lock().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ServiceError> {
        self.items.lock().await.remove(key);
        Ok(())
    }
}
