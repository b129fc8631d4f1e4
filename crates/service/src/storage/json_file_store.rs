use std::{collections::HashMap, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::RwLock};
use tracing::warn;

use super::KeyValueStorage;
use crate::errors::ServiceError;

/// String map persisted to a single JSON file.
///
/// The whole map is rewritten on every mutation (temp file + rename), which
/// is plenty for the two or three keys a session needs. The in-memory map
/// only changes once the file write has succeeded.
pub struct JsonFileStorage {
    inner: RwLock<HashMap<String, String>>,
    file_path: PathBuf,
}

impl JsonFileStorage {
    /// Open the store at `path`. A missing file starts empty; a corrupt one is
    /// logged and treated as empty rather than failing startup.
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, ServiceError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        }

        let map = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %file_path.display(), error = %e, "storage file is not valid JSON; starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        Ok(Arc::new(Self { inner: RwLock::new(map), file_path }))
    }

    async fn save(&self, map: &HashMap<String, String>) -> Result<(), ServiceError> {
        let data = serde_json::to_vec_pretty(map).map_err(|e| ServiceError::Storage(e.to_string()))?;
        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, data).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.file_path).await.map_err(|e| ServiceError::Storage(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorage for JsonFileStorage {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.inner.read().await.get(key).cloned()
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.set_items(&[(key, value)]).await
    }

    async fn set_items(&self, items: &[(&str, String)]) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        for (key, value) in items {
            next.insert(key.to_string(), value.clone());
        }
        self.save(&next).await?;
        *map = next;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ServiceError> {
        self.remove_items(&[key]).await
    }

    async fn remove_items(&self, keys: &[&str]) -> Result<(), ServiceError> {
        let mut map = self.inner.write().await;
        let mut next = map.clone();
        for key in keys {
            next.remove(*key);
        }
        if next.len() == map.len() && fs::metadata(&self.file_path).await.is_ok() {
            return Ok(());
        }
        self.save(&next).await?;
        *map = next;
        Ok(())
    }
}
