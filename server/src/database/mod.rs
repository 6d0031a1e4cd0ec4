//! SQLite adapter
//!
//! One table per resource plus the pinned settings row. The database file
//! lives at `DATABASE_PATH`, which defaults to `<DATA_DIR>/site.db`.

pub mod repository;
pub mod schema;

pub use repository::{Repository, SettingsRepository};
pub use schema::initialize_database;

use crate::config::{DATABASE_BUSY_TIMEOUT_SECS, DATABASE_MAX_CONNECTIONS};
use crate::error::Result;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteConnection, SqliteJournalMode, SqlitePoolOptions,
    SqliteSynchronous,
};
use sqlx::{ConnectOptions, Connection, SqlitePool};
use std::path::Path;
use std::time::Duration;

fn connect_options(db_path: &Path) -> SqliteConnectOptions {
    SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(DATABASE_BUSY_TIMEOUT_SECS))
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
}

/// Open the site database, creating the file and its directory when missing.
///
/// The schema is migrated on one standalone connection before the request
/// pool opens, so every pooled connection starts on the final schema.
pub async fn create_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::info!("Opening site database at {:?}", db_path);

    // DATABASE_PATH may point outside the data directory.
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let options = connect_options(db_path);

    let mut conn: SqliteConnection = options.connect().await?;
    let version = initialize_database(&mut conn).await?;
    conn.close().await?;

    let pool = SqlitePoolOptions::new()
        .max_connections(DATABASE_MAX_CONNECTIONS)
        .connect_with(options)
        .await?;

    tracing::info!("Site database ready (schema version {})", version);

    Ok(pool)
}
