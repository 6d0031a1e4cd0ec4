//! Resource service
//!
//! Business logic shared by every CRUD resource. Persistence, including the
//! per-resource patch guard, is delegated to whichever store adapter was
//! configured so the guard and the write happen in one step.

use crate::error::Result;
use crate::storage::{Resource, Store};
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Service for one resource collection
pub struct ResourceService<R: Resource> {
    store: Arc<dyn Store<R>>,
}

impl<R: Resource> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<R: Resource> ResourceService<R> {
    pub fn new(store: Arc<dyn Store<R>>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<R>> {
        self.store.list().await
    }

    pub async fn get(&self, id: i64) -> Result<R> {
        self.store.get(id).await
    }

    pub async fn create(&self, new: R::New) -> Result<R> {
        let record = self.store.create(new).await?;

        tracing::info!("{} created: {}", R::NAME, record.id());

        Ok(record)
    }

    /// Create a record that keeps an existing creation time (imports).
    pub async fn create_at(&self, new: R::New, created_at: DateTime<Utc>) -> Result<R> {
        let record = self.store.insert(new, created_at).await?;

        tracing::info!("{} imported: {} (created {})", R::NAME, record.id(), created_at);

        Ok(record)
    }

    /// Apply a partial update; the store rejects it if the guard fails.
    pub async fn update(&self, id: i64, patch: R::Patch) -> Result<R> {
        tracing::debug!("Updating {} {}", R::NAME, id);

        let record = self.store.update_fields(id, &patch).await?;

        tracing::info!("{} updated: {}", R::NAME, id);

        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_by_id(id).await?;

        tracing::info!("{} deleted: {}", R::NAME, id);

        Ok(())
    }
}
