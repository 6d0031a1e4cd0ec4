//! Storage module
//!
//! Defines the store contracts shared by every resource and builds the
//! adapter set selected by configuration:
//! - `file_store`: one JSON document per collection, rewritten on every change
//! - `database::repository`: one SQLite table per collection

pub mod file_store;
pub mod resource;

pub use file_store::{FileSettingsStore, FileStore};
pub use resource::{Column, FailureMessages, Resource};

use crate::config::{Config, StoreBackend, SETTINGS_FILE_NAME};
use crate::database::{create_pool, Repository, SettingsRepository};
use crate::error::Result;
use crate::resources::{
    Admission, AlumniProfile, ContactMessage, NewsItem, Publication, Settings,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Durable collection of records for one resource
#[async_trait]
pub trait Store<R: Resource>: Send + Sync {
    /// All records, in the resource's list order
    async fn list(&self) -> Result<Vec<R>>;

    async fn get(&self, id: i64) -> Result<R>;

    /// Assign an id, apply defaults and persist, stamped with the current time.
    async fn create(&self, new: R::New) -> Result<R> {
        self.insert(new, Utc::now()).await
    }

    /// Like [`Store::create`], keeping a creation time from elsewhere
    /// (records carried over from a legacy document).
    async fn insert(&self, new: R::New, created_at: DateTime<Utc>) -> Result<R>;

    /// Change only the patched fields of an existing record.
    ///
    /// The resource's patch check runs against the stored record in the
    /// same step as the write, so two conflicting patches cannot both pass.
    async fn update_fields(&self, id: i64, patch: &R::Patch) -> Result<R>;

    async fn delete_by_id(&self, id: i64) -> Result<()>;
}

/// Store holding zero or one settings record
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn load(&self) -> Result<Option<Settings>>;

    /// Create the record on first save, overwrite it wholesale afterwards.
    async fn save(&self, settings: Settings) -> Result<Settings>;
}

/// One store per resource, all backed by the same adapter
#[derive(Clone)]
pub struct Stores {
    pub admissions: Arc<dyn Store<Admission>>,
    pub alumni: Arc<dyn Store<AlumniProfile>>,
    pub news: Arc<dyn Store<NewsItem>>,
    pub publications: Arc<dyn Store<Publication>>,
    pub messages: Arc<dyn Store<ContactMessage>>,
    pub settings: Arc<dyn SettingsStore>,
}

impl Stores {
    /// Build the store set for the configured backend.
    pub async fn open(config: &Config) -> Result<Self> {
        match config.backend {
            StoreBackend::File => {
                tracing::info!("Using file-backed stores in {:?}", config.data_dir);
                tokio::fs::create_dir_all(&config.data_dir).await?;
                let dir = &config.data_dir;

                Ok(Self {
                    admissions: Arc::new(FileStore::<Admission>::new(dir)),
                    alumni: Arc::new(FileStore::<AlumniProfile>::new(dir)),
                    news: Arc::new(FileStore::<NewsItem>::new(dir)),
                    publications: Arc::new(FileStore::<Publication>::new(dir)),
                    messages: Arc::new(FileStore::<ContactMessage>::new(dir)),
                    settings: Arc::new(FileSettingsStore::new(dir.join(SETTINGS_FILE_NAME))),
                })
            }
            StoreBackend::Database => {
                tracing::info!("Using database-backed stores at {:?}", config.database_path);
                let pool = create_pool(&config.database_path).await?;
                Ok(Self::from_pool(pool))
            }
        }
    }

    /// Database-backed stores over an existing, migrated pool.
    pub fn from_pool(pool: sqlx::SqlitePool) -> Self {
        Self {
            admissions: Arc::new(Repository::<Admission>::new(pool.clone())),
            alumni: Arc::new(Repository::<AlumniProfile>::new(pool.clone())),
            news: Arc::new(Repository::<NewsItem>::new(pool.clone())),
            publications: Arc::new(Repository::<Publication>::new(pool.clone())),
            messages: Arc::new(Repository::<ContactMessage>::new(pool.clone())),
            settings: Arc::new(SettingsRepository::new(pool)),
        }
    }
}
