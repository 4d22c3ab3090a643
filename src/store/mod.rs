//! Link record store
//!
//! An abstract persistent mapping from custom path to [`LinkRecord`].
//! `put` is an atomic conditional insert: it fails with
//! [`StoreError::Conflict`] when the path already holds a record, which is
//! what makes concurrent creations of the same path safe without any
//! locking in the service layer.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::LinkRecord;

mod file;
mod memory;
mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Fast existence check, used to fail duplicate creates before any
    /// network call is made
    async fn exists(&self, path: &str) -> Result<bool, StoreError>;

    /// Point lookup
    async fn get(&self, path: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Conditional insert; `Err(StoreError::Conflict)` when the path is taken
    async fn put(&self, record: LinkRecord) -> Result<(), StoreError>;

    /// Full enumeration, order unspecified
    async fn list_all(&self) -> Result<Vec<LinkRecord>, StoreError>;
}
