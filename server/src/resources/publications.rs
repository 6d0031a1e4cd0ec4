//! Publications (books, journals, downloadable material)

use super::reconcile;
use crate::storage::resource::{newest_first, Column, FailureMessages, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub author: String,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub download_link: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(from = "PublicationForm")]
pub struct NewPublication {
    pub title: String,
    pub category: String,
    pub author: String,
    pub date: String,
    pub description: Option<String>,
    pub cover_image: Option<String>,
    pub download_link: Option<String>,
}

/// Publication form as submitted; `cover` and `download` are the legacy
/// names. The current names win when both are sent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublicationForm {
    title: String,
    category: String,
    author: String,
    date: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    cover_image: Option<String>,
    #[serde(default)]
    cover: Option<String>,
    #[serde(default)]
    download_link: Option<String>,
    #[serde(default)]
    download: Option<String>,
}

impl From<PublicationForm> for NewPublication {
    fn from(form: PublicationForm) -> Self {
        NewPublication {
            title: form.title,
            category: form.category,
            author: form.author,
            date: form.date,
            description: form.description,
            cover_image: reconcile(form.cover_image, form.cover),
            download_link: reconcile(form.download_link, form.download),
        }
    }
}

impl Resource for Publication {
    type New = NewPublication;
    type Patch = ();

    const NAME: &'static str = "Publication";
    const COLLECTION: &'static str = "publications";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    const PATCHABLE: bool = false;
    const DELETABLE: bool = true;
    const FAILURES: FailureMessages = FailureMessages {
        list: "Failed to fetch publications",
        create: "Failed to save publication",
        update: "Failed to update publication",
        delete: "Failed to delete publication",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn build(id: i64, created_at: DateTime<Utc>, new: NewPublication) -> Self {
        Publication {
            id,
            title: new.title,
            category: new.category,
            author: new.author,
            date: new.date,
            description: new.description,
            cover_image: new.cover_image,
            download_link: new.download_link,
            created_at,
        }
    }

    fn columns(&self) -> Vec<(&'static str, Column)> {
        vec![
            ("title", self.title.clone().into()),
            ("category", self.category.clone().into()),
            ("author", self.author.clone().into()),
            ("date", self.date.clone().into()),
            ("description", self.description.clone().into()),
            ("cover_image", self.cover_image.clone().into()),
            ("download_link", self.download_link.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }

    fn apply(&mut self, _patch: &()) {}

    fn patch_columns(_patch: &()) -> Vec<(&'static str, Column)> {
        Vec::new()
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        newest_first((a.created_at, a.id), (b.created_at, b.id))
    }
}
