use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::KeyValueStorage;
use crate::errors::ServiceError;

/// Process-local storage; nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize {
        self.items.lock().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

fn poisoned() -> ServiceError { ServiceError::Storage("storage lock poisoned".into()) }

#[async_trait]
impl KeyValueStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().ok()?.get(key).cloned()
    }

    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.items.lock().map_err(|_| poisoned())?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), ServiceError> {
        self.items.lock().map_err(|_| poisoned())?.remove(key);
        Ok(())
    }
}
