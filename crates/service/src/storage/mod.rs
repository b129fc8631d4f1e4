//! Client-side persistent storage.
//!
//! A tiny string key/value contract in the spirit of browser `localStorage`,
//! with a JSON-file implementation for the CLI and an in-memory one for tests.

pub mod json_file_store;
pub mod memory;

use async_trait::async_trait;

use crate::errors::ServiceError;

pub use json_file_store::JsonFileStorage;
pub use memory::MemoryStorage;

#[async_trait]
pub trait KeyValueStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Option<String>;
    async fn set_item(&self, key: &str, value: String) -> Result<(), ServiceError>;
    async fn remove_item(&self, key: &str) -> Result<(), ServiceError>;

    /// Write several keys; implementations may persist them in one step.
    async fn set_items(&self, items: &[(&str, String)]) -> Result<(), ServiceError> {
        for (key, value) in items {
            self.set_item(key, value.clone()).await?;
        }
        Ok(())
    }

    /// Remove several keys; implementations may persist once for all of them.
    async fn remove_items(&self, keys: &[&str]) -> Result<(), ServiceError> {
        for key in keys {
            self.remove_item(key).await?;
        }
        Ok(())
    }
}
