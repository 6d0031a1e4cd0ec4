//! Database schema and migrations
//!
//! Migrations are embedded SQL scripts applied in version order. Each one
//! runs in its own transaction and is recorded in `schema_migrations`.

use crate::error::{AppError, Result};
use chrono::Utc;
use sqlx::{Connection, SqliteConnection};

struct Migration {
    version: i64,
    name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_schema",
    sql: include_str!("migrations/001_initial_schema.sql"),
}];

/// Newest schema version this build knows about
pub fn latest_version() -> i64 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Bring the schema up to date and return its version.
///
/// A database written by a newer build is refused rather than used with a
/// schema this build does not understand.
pub async fn initialize_database(conn: &mut SqliteConnection) -> Result<i64> {
    sqlx::raw_sql(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    let current: i64 =
        sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
            .fetch_one(&mut *conn)
            .await?;

    if current > latest_version() {
        return Err(AppError::Configuration(format!(
            "database schema version {} is newer than this build supports ({})",
            current,
            latest_version()
        )));
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tracing::info!(
            "Applying migration {} ({})",
            migration.version,
            migration.name
        );

        let mut tx = conn.begin().await?;
        sqlx::raw_sql(migration.sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO schema_migrations (version, name, applied_at) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    tracing::debug!("Database schema at version {}", latest_version());
    Ok(latest_version())
}
