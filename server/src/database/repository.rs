//! Repository layer for database operations
//!
//! Implements the store contracts over SQLite. Each operation is a single
//! statement, so SQLite's per-statement atomicity covers it; no operation
//! spans more than one record.

use crate::error::{AppError, Result};
use crate::resources::Settings;
use crate::storage::resource::{Column, Resource};
use crate::storage::{SettingsStore, Store};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::marker::PhantomData;

/// Table-backed store for one resource
pub struct Repository<R> {
    pool: SqlitePool,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> Repository<R> {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            _resource: PhantomData,
        }
    }
}

impl<R> Clone for Repository<R> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _resource: PhantomData,
        }
    }
}

fn push_column(builder: &mut QueryBuilder<'_, Sqlite>, value: Column) {
    match value {
        Column::Text(text) => builder.push_bind(text),
        Column::OptionalText(text) => builder.push_bind(text),
        Column::Bool(flag) => builder.push_bind(flag),
        Column::Timestamp(at) => builder.push_bind(at),
    };
}

#[async_trait]
impl<R: Resource> Store<R> for Repository<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let sql = format!("SELECT * FROM {} ORDER BY {}", R::COLLECTION, R::ORDER_BY);

        let records = sqlx::query_as::<_, R>(&sql).fetch_all(&self.pool).await?;

        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<R> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", R::COLLECTION);

        sqlx::query_as::<_, R>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::not_found(R::NAME, id))
    }

    async fn insert(&self, new: R::New, created_at: DateTime<Utc>) -> Result<R> {
        // The id placeholder is never written; the table assigns the real one.
        let draft = R::build(0, created_at, new);
        let columns = draft.columns();

        let names: Vec<&str> = columns.iter().map(|(name, _)| *name).collect();
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "INSERT INTO {} ({}) VALUES (",
            R::COLLECTION,
            names.join(", ")
        ));

        for (index, (_, value)) in columns.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            push_column(&mut builder, value);
        }
        builder.push(") RETURNING *");

        let record = builder
            .build_query_as::<R>()
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Created {} row: {}", R::COLLECTION, record.id());
        Ok(record)
    }

    async fn update_fields(&self, id: i64, patch: &R::Patch) -> Result<R> {
        let current = self.get(id).await?;
        current.check_patch(patch)?;

        let columns = R::patch_columns(patch);
        if columns.is_empty() {
            return Ok(current);
        }

        let mut builder = QueryBuilder::<Sqlite>::new(format!("UPDATE {} SET ", R::COLLECTION));
        for (index, (name, value)) in columns.into_iter().enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            builder.push(name).push(" = ");
            push_column(&mut builder, value);
        }
        builder.push(" WHERE id = ").push_bind(id);
        for (name, value) in R::patch_guard(patch) {
            builder.push(" AND ").push(name).push(" = ");
            push_column(&mut builder, value);
        }
        builder.push(" RETURNING *");

        let updated = builder
            .build_query_as::<R>()
            .fetch_optional(&self.pool)
            .await?;

        match updated {
            Some(record) => {
                tracing::debug!("Updated {} row: {}", R::COLLECTION, id);
                Ok(record)
            }
            None => {
                // Deleted or changed by another writer since it was read.
                let latest = self.get(id).await?;
                latest.check_patch(patch)?;
                Err(AppError::InvalidTransition(format!(
                    "{} {} was changed by another request",
                    R::NAME,
                    id
                )))
            }
        }
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?", R::COLLECTION);

        let rows = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();

        if rows == 0 {
            return Err(AppError::not_found(R::NAME, id));
        }

        tracing::debug!("Deleted {} row: {}", R::COLLECTION, id);
        Ok(())
    }
}

/// Settings row, pinned to `id = 1`
#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    async fn load(&self) -> Result<Option<Settings>> {
        let settings = sqlx::query_as::<_, Settings>("SELECT * FROM settings WHERE id = 1")
            .fetch_optional(&self.pool)
            .await?;

        Ok(settings)
    }

    async fn save(&self, settings: Settings) -> Result<Settings> {
        let saved = sqlx::query_as::<_, Settings>(
            r#"
            INSERT INTO settings (
                id, institution_name, tagline, hero_verse, email, phone, phone_secondary,
                address, facebook, twitter, instagram, youtube, updated_at
            )
            VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                institution_name = excluded.institution_name,
                tagline = excluded.tagline,
                hero_verse = excluded.hero_verse,
                email = excluded.email,
                phone = excluded.phone,
                phone_secondary = excluded.phone_secondary,
                address = excluded.address,
                facebook = excluded.facebook,
                twitter = excluded.twitter,
                instagram = excluded.instagram,
                youtube = excluded.youtube,
                updated_at = excluded.updated_at
            RETURNING *
            "#,
        )
        .bind(&settings.institution_name)
        .bind(&settings.tagline)
        .bind(&settings.hero_verse)
        .bind(&settings.email)
        .bind(&settings.phone)
        .bind(&settings.phone_secondary)
        .bind(&settings.address)
        .bind(&settings.facebook)
        .bind(&settings.twitter)
        .bind(&settings.instagram)
        .bind(&settings.youtube)
        .bind(settings.updated_at)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!("Settings saved to database");
        Ok(saved)
    }
}
