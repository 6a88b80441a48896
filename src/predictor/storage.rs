//! Namespaced key/value persistence for cache state and preferences.

use crate::error::Result;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

#[async_trait]
pub trait Backend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
    async fn keys(&self) -> Result<Vec<String>>;
}

pub const LOCAL: &str = "LOCAL";
pub const SYNC: &str = "SYNC";

#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn Backend>,
    name: String,
}

impl Storage {
    pub fn new<T: Into<String>>(backend: Arc<dyn Backend>, name: T) -> Self {
        Self {
            backend,
            name: name.into(),
        }
    }
    pub fn local(backend: Arc<dyn Backend>) -> Self {
        Self::new(backend, LOCAL)
    }
    pub fn sync(backend: Arc<dyn Backend>) -> Self {
        Self::new(backend, SYNC)
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }

    /// Reads `key`, falling back to `default` when it was never written.
    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T> {
        match self.backend.get(&self.full_key(key)).await? {
            Some(v) => Ok(serde_json::from_value(v)?),
            None => Ok(default),
        }
    }
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.backend
            .set(&self.full_key(key), serde_json::to_value(value)?)
            .await
    }
    /// Removes every key of this namespace.
    pub async fn clear(&self) -> Result<usize> {
        let prefix = format!("{}.", self.name);
        let mut count = 0;
        for key in self.backend.keys().await? {
            if key.starts_with(&prefix) {
                self.backend.remove(&key).await?;
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn namespaces_are_separate() {
        let backend: Arc<dyn Backend> = Arc::new(MemoryBackend::new());
        let local = Storage::local(backend.clone());
        let sync = Storage::sync(backend.clone());
        local.set("cache.timestamp", &42i64).await.unwrap();
        sync.set("settings.flag", &false).await.unwrap();

        assert_eq!(local.get("cache.timestamp", 0i64).await.unwrap(), 42);
        assert_eq!(sync.get("cache.timestamp", 0i64).await.unwrap(), 0);
        assert!(backend.get("LOCAL.cache.timestamp").await.unwrap().is_some());

        assert_eq!(local.clear().await.unwrap(), 1);
        assert_eq!(local.get("cache.timestamp", 7i64).await.unwrap(), 7);
        assert!(!sync.get("settings.flag", true).await.unwrap());
    }

    #[tokio::test]
    async fn default_for_missing_map() {
        let storage = Storage::local(Arc::new(MemoryBackend::new()));
        let map: HashMap<u32, String> = storage.get("missing", HashMap::new()).await.unwrap();
        assert!(map.is_empty());
    }
}
