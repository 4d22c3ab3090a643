//! In-memory store backend, used by tests

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::models::LinkRecord;

use super::LinkStore;

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, LinkRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        Ok(self.records.lock().await.contains_key(path))
    }

    async fn get(&self, path: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.records.lock().await.get(path).cloned())
    }

    async fn put(&self, record: LinkRecord) -> Result<(), StoreError> {
        let mut records = self.records.lock().await;
        if records.contains_key(&record.custom_path) {
            return Err(StoreError::Conflict);
        }
        records.insert(record.custom_path.clone(), record);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>, StoreError> {
        Ok(self.records.lock().await.values().cloned().collect())
    }
}
