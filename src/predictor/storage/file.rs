use super::Backend;
use crate::error::{storage_error, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tokio::{fs, sync::Mutex};

const EXTENSION: &str = "yaml";

/// Storage kept as a directory of yaml documents, one per key, so a change
/// only rewrites the file of the key it touches.
pub struct FileBackend {
    dir: PathBuf,
    map: Mutex<BTreeMap<String, Value>>,
}

impl FileBackend {
    pub async fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        let mut map = BTreeMap::new();
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    dir,
                    map: Mutex::new(map),
                })
            }
            Err(e) => return Err(storage_error(e)),
        };
        while let Some(entry) = entries.next_entry().await.map_err(storage_error)? {
            let path = entry.path();
            if path.extension().map_or(true, |e| e != EXTENSION) {
                continue;
            }
            let key = match path.file_stem().and_then(|s| s.to_str()) {
                Some(k) => k.to_owned(),
                None => continue,
            };
            let text = fs::read_to_string(&path).await.map_err(storage_error)?;
            map.insert(key, serde_yaml::from_str(&text).map_err(storage_error)?);
        }
        Ok(Self {
            dir,
            map: Mutex::new(map),
        })
    }
    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn file(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", key, EXTENSION))
    }

    async fn save(&self, key: &str, value: &Value) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(storage_error)?;
        let text = serde_yaml::to_string(value).map_err(storage_error)?;
        fs::write(self.file(key), text).await.map_err(storage_error)
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.map.lock().await.get(key).cloned())
    }
    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut map = self.map.lock().await;
        self.save(key, &value).await?;
        map.insert(key.to_owned(), value);
        Ok(())
    }
    async fn remove(&self, key: &str) -> Result<()> {
        let mut map = self.map.lock().await;
        if map.remove(key).is_some() {
            match fs::remove_file(self.file(key)).await {
                Err(e) if e.kind() != std::io::ErrorKind::NotFound => {
                    return Err(storage_error(e))
                }
                _ => {}
            }
        }
        Ok(())
    }
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self.map.lock().await.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store");
        {
            let backend = FileBackend::open(&path).await.unwrap();
            backend
                .set("LOCAL.cache.contests", serde_json::json!({"1500": {"id": 1500}}))
                .await
                .unwrap();
            backend.set("SYNC.flag", Value::Bool(false)).await.unwrap();
            assert!(path.join("SYNC.flag.yaml").exists());
            backend.remove("SYNC.flag").await.unwrap();
            assert!(!path.join("SYNC.flag.yaml").exists());
        }
        let backend = FileBackend::open(&path).await.unwrap();
        assert_eq!(
            backend.get("LOCAL.cache.contests").await.unwrap(),
            Some(serde_json::json!({"1500": {"id": 1500}}))
        );
        assert_eq!(backend.get("SYNC.flag").await.unwrap(), None);
        assert_eq!(backend.keys().await.unwrap(), vec!["LOCAL.cache.contests"]);
    }

    #[tokio::test]
    async fn set_rewrites_only_its_key() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).await.unwrap();
        backend
            .set("LOCAL.cache.ratings", serde_json::json!({"alice": 1500}))
            .await
            .unwrap();
        // Edited behind the backend's back; a later unrelated set must not
        // overwrite it.
        std::fs::write(dir.path().join("LOCAL.cache.ratings.yaml"), "alice: 1600\n").unwrap();
        backend
            .set("SYNC.settings.showColRankChange", Value::Bool(false))
            .await
            .unwrap();

        let reopened = FileBackend::open(dir.path()).await.unwrap();
        assert_eq!(
            reopened.get("LOCAL.cache.ratings").await.unwrap(),
            Some(serde_json::json!({"alice": 1600}))
        );
        assert_eq!(
            reopened.get("SYNC.settings.showColRankChange").await.unwrap(),
            Some(Value::Bool(false))
        );
    }

    #[tokio::test]
    async fn ignores_foreign_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let backend = FileBackend::open(dir.path()).await.unwrap();
        assert!(backend.keys().await.unwrap().is_empty());
    }
}
