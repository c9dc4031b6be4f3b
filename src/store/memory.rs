use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use std::sync::Arc;

use super::{MappingStore, StoreError};
use crate::models::UrlMapping;

/// Process-local store keyed by short code.
///
/// Backed by a DashMap, so each insert and increment holds only the shard lock
/// for its own key. Contents are lost when the process exits.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<DashMap<String, UrlMapping>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl MappingStore for MemoryStore {
    async fn insert(&self, mapping: &UrlMapping) -> Result<(), StoreError> {
        match self.inner.entry(mapping.short_url.clone()) {
            Entry::Occupied(_) => Err(StoreError::Conflict(mapping.short_url.clone())),
            Entry::Vacant(slot) => {
                slot.insert(mapping.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, short_url: &str) -> Result<Option<UrlMapping>, StoreError> {
        Ok(self.inner.get(short_url).map(|m| m.clone()))
    }

    async fn increment(&self, short_url: &str, delta: i64) -> Result<(), StoreError> {
        match self.inner.get_mut(short_url) {
            Some(mut mapping) => {
                mapping.access_count += delta;
                Ok(())
            }
            None => Err(StoreError::Missing(short_url.to_owned())),
        }
    }
}
