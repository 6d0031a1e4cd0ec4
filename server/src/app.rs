//! Application state and initialization
//!
//! This module manages the central application state and lifecycle.
//! All services are initialized here and made available through AppState.

use crate::config::Config;
use crate::error::Result;
use crate::resources::{Admission, AlumniProfile, ContactMessage, NewsItem, Publication};
use crate::services::{DashboardService, ResourceService, SettingsService};
use crate::storage::Stores;
use std::sync::Arc;

/// Central application state holding all services
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub admissions: ResourceService<Admission>,
    pub alumni: ResourceService<AlumniProfile>,
    pub news: ResourceService<NewsItem>,
    pub publications: ResourceService<Publication>,
    pub messages: ResourceService<ContactMessage>,
    pub settings: SettingsService,
    pub dashboard: DashboardService,
}

impl AppState {
    pub fn new(config: Config, stores: Stores) -> Self {
        let admissions = ResourceService::new(stores.admissions);
        let news = ResourceService::new(stores.news);
        let messages = ResourceService::new(stores.messages);
        let dashboard = DashboardService::new(admissions.clone(), news.clone(), messages.clone());

        Self {
            config: Arc::new(config),
            admissions,
            alumni: ResourceService::new(stores.alumni),
            news,
            publications: ResourceService::new(stores.publications),
            messages,
            settings: SettingsService::new(stores.settings),
            dashboard,
        }
    }
}

/// Application setup - called once on startup
pub async fn setup(config: &Config) -> Result<AppState> {
    tracing::info!("Initializing application");
    tracing::info!("Data directory: {:?}", config.data_dir);

    tokio::fs::create_dir_all(&config.data_dir).await?;

    let stores = Stores::open(config).await?;
    let state = AppState::new(config.clone(), stores);

    tracing::info!("Application initialized successfully");

    Ok(state)
}
