//! News items

use crate::storage::resource::{Column, FailureMessages, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "TEXT")]
pub enum NewsStatus {
    #[default]
    Draft,
    Published,
}

impl NewsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NewsStatus::Draft => "Draft",
            NewsStatus::Published => "Published",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: i64,
    pub title: String,
    /// Publication date as entered (YYYY-MM-DD)
    pub date: String,
    pub category: String,
    pub status: NewsStatus,
    pub content: String,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewNewsItem {
    pub title: String,
    pub date: String,
    pub category: String,
    #[serde(default)]
    pub status: NewsStatus,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Resource for NewsItem {
    type New = NewNewsItem;
    type Patch = ();

    const NAME: &'static str = "News";
    const COLLECTION: &'static str = "news";
    const ORDER_BY: &'static str = "date DESC, id DESC";
    const PATCHABLE: bool = false;
    const DELETABLE: bool = true;
    const FAILURES: FailureMessages = FailureMessages {
        list: "Failed to fetch news",
        create: "Failed to save news",
        update: "Failed to update news",
        delete: "Failed to delete news",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn build(id: i64, created_at: DateTime<Utc>, new: NewNewsItem) -> Self {
        NewsItem {
            id,
            title: new.title,
            date: new.date,
            category: new.category,
            status: new.status,
            content: new.content.unwrap_or_default(),
            image: new.image.unwrap_or_default(),
            created_at,
        }
    }

    fn columns(&self) -> Vec<(&'static str, Column)> {
        vec![
            ("title", self.title.clone().into()),
            ("date", self.date.clone().into()),
            ("category", self.category.clone().into()),
            ("status", self.status.as_str().into()),
            ("content", self.content.clone().into()),
            ("image", self.image.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }

    fn apply(&mut self, _patch: &()) {}

    fn patch_columns(_patch: &()) -> Vec<(&'static str, Column)> {
        Vec::new()
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        b.date.cmp(&a.date).then(b.id.cmp(&a.id))
    }
}
