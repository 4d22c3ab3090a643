//! Flat-file store backend
//!
//! A single JSON document `{"links": [...]}` rewritten whole on every
//! insert. All access goes through one mutex, so the existence check and
//! the write that follows it are atomic with respect to other requests.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::StoreError;
use crate::models::LinkRecord;

use super::LinkStore;

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    links: Vec<LinkRecord>,
}

pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open (creating if needed) the JSON document at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.into()))?;
            }
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };

        if !store.path.exists() {
            store.save(&Document::default()).await?;
            info!("Initialized new link document: {}", store.path.display());
        } else {
            // Validate on open so a corrupt document fails at startup,
            // not on the first request
            store.load().await?;
            info!("Opened existing link document: {}", store.path.display());
        }

        Ok(store)
    }

    async fn load(&self) -> Result<Document, StoreError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Backend(e.into()))?;
        serde_json::from_str(&raw).map_err(|e| StoreError::Backend(e.into()))
    }

    async fn save(&self, doc: &Document) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(doc).map_err(|e| StoreError::Backend(e.into()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|e| StoreError::Backend(e.into()))
    }
}

#[async_trait]
impl LinkStore for FileStore {
    async fn exists(&self, path: &str) -> Result<bool, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.links.iter().any(|r| r.custom_path == path))
    }

    async fn get(&self, path: &str) -> Result<Option<LinkRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.links.into_iter().find(|r| r.custom_path == path))
    }

    async fn put(&self, record: LinkRecord) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        if doc.links.iter().any(|r| r.custom_path == record.custom_path) {
            return Err(StoreError::Conflict);
        }

        doc.links.push(record);
        self.save(&doc).await
    }

    async fn list_all(&self) -> Result<Vec<LinkRecord>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        Ok(doc.links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlatformEntry, Provenance};

    fn sample_record(path: &str) -> LinkRecord {
        LinkRecord {
            custom_path: path.to_string(),
            display_title: "Artist X - Original".to_string(),
            thumbnail_url: "https://img.example/a.jpg".to_string(),
            platform_links: vec![
                PlatformEntry {
                    platform: "spotify".to_string(),
                    url: "https://spotify.example/1".to_string(),
                    entity_unique_id: None,
                },
                PlatformEntry {
                    platform: "deezer".to_string(),
                    url: "https://deezer.example/1".to_string(),
                    entity_unique_id: None,
                },
            ],
            provenance: Provenance::default(),
        }
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).await.unwrap();

        store.put(sample_record("mix")).await.unwrap();
        let loaded = store.get("mix").await.unwrap().unwrap();

        assert_eq!(loaded.custom_path, "mix");
        assert_eq!(loaded.platform_links, sample_record("mix").platform_links);
    }

    #[tokio::test]
    async fn test_duplicate_put_is_conflict() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("db.json")).await.unwrap();

        store.put(sample_record("mix")).await.unwrap();
        assert!(matches!(
            store.put(sample_record("mix")).await,
            Err(StoreError::Conflict)
        ));
    }

    #[tokio::test]
    async fn test_document_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        {
            let store = FileStore::open(&path).await.unwrap();
            store.put(sample_record("kept")).await.unwrap();
        }

        let store = FileStore::open(&path).await.unwrap();
        assert!(store.exists("kept").await.unwrap());
        assert_eq!(store.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_document_fails_at_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(FileStore::open(&path).await.is_err());
    }
}
