// lib/src/storage_engine/inmemory_storage.rs

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use models::errors::HospitalResult;
use tokio::sync::RwLock;

use super::storage_engine::StorageEngine;

/// In-memory implementation for lightweight or testing scenarios. Nothing
/// survives the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: Arc<RwLock<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageEngine for InMemoryStorage {
    async fn connect(&self) -> HospitalResult<()> {
        Ok(())
    }

    async fn insert(&self, key: &[u8], value: &[u8]) -> HospitalResult<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    async fn retrieve(&self, key: &[u8]) -> HospitalResult<Option<Vec<u8>>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &[u8]) -> HospitalResult<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    async fn flush(&self) -> HospitalResult<()> {
        Ok(())
    }
}
