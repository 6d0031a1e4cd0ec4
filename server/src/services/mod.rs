//! Services module
//!
//! Business logic that sits between the HTTP handlers and the stores.

pub mod collection;
pub mod dashboard;
pub mod import;
pub mod settings;

pub use collection::ResourceService;
pub use dashboard::{DashboardService, DashboardStats};
pub use import::{import_legacy, seed_demo, CollectionReport, ImportReport};
pub use settings::SettingsService;
