//! Settings service
//!
//! Owns the site-wide settings record. The record is loaded from the store
//! once and cached; saving writes through to the store and replaces the
//! cached copy, so readers never see a stale record after a save.

use crate::error::Result;
use crate::resources::{Settings, SettingsInput};
use crate::storage::SettingsStore;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Service for managing the settings singleton
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn SettingsStore>,
    cache: Arc<RwLock<Option<Settings>>>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self {
            store,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// The current settings, or `None` if nothing has been saved yet
    pub async fn current(&self) -> Result<Option<Settings>> {
        if let Some(settings) = self.cache.read().await.as_ref() {
            return Ok(Some(settings.clone()));
        }

        let mut cache = self.cache.write().await;
        if cache.is_none() {
            *cache = self.store.load().await?;
            if cache.is_some() {
                tracing::debug!("Settings loaded into cache");
            }
        }

        Ok(cache.clone())
    }

    /// Replace the settings record (created on first save)
    pub async fn save(&self, input: SettingsInput) -> Result<Settings> {
        let mut cache = self.cache.write().await;

        let saved = self.store.save(input.into_settings(Utc::now())).await?;
        *cache = Some(saved.clone());

        tracing::info!("Settings updated for {:?}", saved.institution_name);

        Ok(saved)
    }

    /// Drop the cached record so the next read goes to the store.
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}
