use crate::core::{CacheEntry, KeyValueStore};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, item: CacheEntry) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(item.email.clone(), item);
        Ok(())
    }
}

/// Keeps a whole table as one JSON object in `<base_path>/<table>.json`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(base_path: impl AsRef<Path>, table: &str) -> Self {
        Self {
            path: base_path.as_ref().join(format!("{}.json", table)),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, CacheEntry>> {
        match tokio::fs::read(&self.path).await {
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>> {
        let mut entries = self.load().await?;
        Ok(entries.remove(key))
    }

    async fn put(&self, item: CacheEntry) -> Result<()> {
        // 讀取-修改-寫回 需要序列化，避免同時寫入互相覆蓋
        let _guard = self.write_lock.lock().await;

        let mut entries = self.load().await?;
        entries.insert(item.email.clone(), item);

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_vec_pretty(&entries)?;
        tokio::fs::write(&self.path, data).await?;

        tracing::debug!("Cache file {} now holds {} entries", self.path.display(), entries.len());
        Ok(())
    }
}
