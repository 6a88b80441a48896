use super::Backend;
use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::{collections::HashMap, sync::Mutex};

/// Storage that lives as long as the process.
#[derive(Default)]
pub struct MemoryBackend {
    map: Mutex<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
    fn map(&self) -> std::sync::MutexGuard<'_, HashMap<String, Value>> {
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.map().get(key).cloned())
    }
    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.map().insert(key.to_owned(), value);
        Ok(())
    }
    async fn remove(&self, key: &str) -> Result<()> {
        self.map().remove(key);
        Ok(())
    }
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.map().keys().cloned().collect())
    }
}
