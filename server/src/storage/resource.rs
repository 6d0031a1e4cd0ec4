//! Resource contract
//!
//! Every entity exposed through a CRUD endpoint implements [`Resource`].
//! The trait describes how records of that entity are built, ordered and
//! partially updated, so that both store adapters and the HTTP handlers can
//! stay generic.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;
use std::cmp::Ordering;

/// A single column value written to the relational store
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Text(String),
    OptionalText(Option<String>),
    Bool(bool),
    Timestamp(DateTime<Utc>),
}

impl From<String> for Column {
    fn from(value: String) -> Self {
        Column::Text(value)
    }
}

impl From<&str> for Column {
    fn from(value: &str) -> Self {
        Column::Text(value.to_string())
    }
}

impl From<Option<String>> for Column {
    fn from(value: Option<String>) -> Self {
        Column::OptionalText(value)
    }
}

impl From<bool> for Column {
    fn from(value: bool) -> Self {
        Column::Bool(value)
    }
}

impl From<DateTime<Utc>> for Column {
    fn from(value: DateTime<Utc>) -> Self {
        Column::Timestamp(value)
    }
}

/// Static messages shown when an operation fails on the server side
#[derive(Debug, Clone, Copy)]
pub struct FailureMessages {
    pub list: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

pub trait Resource:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + for<'r> FromRow<'r, SqliteRow> + 'static
{
    /// Create payload, after alias reconciliation
    type New: DeserializeOwned + Send + 'static;
    /// Partial update payload (without the id)
    type Patch: DeserializeOwned + Send + Sync + 'static;

    /// Singular display name, used in messages ("Alumni profile not found")
    const NAME: &'static str;
    /// Table name and JSON document stem
    const COLLECTION: &'static str;
    /// SQL ordering for list queries; must agree with [`Resource::ordering`]
    const ORDER_BY: &'static str;
    const PATCHABLE: bool;
    const DELETABLE: bool;
    const FAILURES: FailureMessages;

    fn id(&self) -> i64;

    /// Build a complete record from a create payload, applying defaults.
    fn build(id: i64, created_at: DateTime<Utc>, new: Self::New) -> Self;

    /// Every persisted column except `id`, in insert order.
    fn columns(&self) -> Vec<(&'static str, Column)>;

    /// Apply a partial update in memory.
    fn apply(&mut self, patch: &Self::Patch);

    /// The columns a partial update touches.
    fn patch_columns(patch: &Self::Patch) -> Vec<(&'static str, Column)>;

    /// List order used by the file store.
    fn ordering(a: &Self, b: &Self) -> Ordering;

    /// Reject a partial update that is not allowed from the current state.
    fn check_patch(&self, _patch: &Self::Patch) -> Result<()> {
        Ok(())
    }

    /// Column values the stored record must still hold when the patch is
    /// written. Stores apply the patch only if every pair matches.
    fn patch_guard(_patch: &Self::Patch) -> Vec<(&'static str, Column)> {
        Vec::new()
    }
}

/// Newest first, ties broken by id.
pub fn newest_first(a: (DateTime<Utc>, i64), b: (DateTime<Utc>, i64)) -> Ordering {
    b.0.cmp(&a.0).then(b.1.cmp(&a.1))
}
