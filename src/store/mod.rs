//! Persistence for URL mappings.
//!
//! Handlers only see the [`MappingStore`] trait; the process picks a backend
//! once at startup and shares it behind an `Arc`. Atomicity of inserts and
//! counter updates is the backend's job, nothing above this layer locks.

use async_trait::async_trait;

use crate::models::UrlMapping;

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A record with this short code already exists.
    #[error("short code '{0}' is already taken")]
    Conflict(String),

    /// No record with this short code exists.
    #[error("short code '{0}' does not exist")]
    Missing(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait MappingStore: Send + Sync {
    /// Insert a new record. Never overwrites: an existing key yields
    /// [`StoreError::Conflict`] and leaves the stored record untouched.
    async fn insert(&self, mapping: &UrlMapping) -> Result<(), StoreError>;

    /// Point lookup by short code.
    async fn get(&self, short_url: &str) -> Result<Option<UrlMapping>, StoreError>;

    /// Atomically add `delta` to the record's access counter.
    async fn increment(&self, short_url: &str, delta: i64) -> Result<(), StoreError>;
}
