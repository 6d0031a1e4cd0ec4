//! Alumni profiles shown on the public alumni page

use crate::storage::resource::{Column, FailureMessages, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AlumniProfile {
    pub id: i64,
    pub name: String,
    /// Graduation year, kept as entered ("2010")
    pub year: String,
    pub position: String,
    pub visible: bool,
    #[serde(default)]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAlumniProfile {
    pub name: String,
    pub year: String,
    pub position: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlumniPatch {
    #[serde(default)]
    pub visible: Option<bool>,
}

impl Resource for AlumniProfile {
    type New = NewAlumniProfile;
    type Patch = AlumniPatch;

    const NAME: &'static str = "Alumni profile";
    const COLLECTION: &'static str = "alumni";
    const ORDER_BY: &'static str = "year DESC, id DESC";
    const PATCHABLE: bool = true;
    const DELETABLE: bool = true;
    const FAILURES: FailureMessages = FailureMessages {
        list: "Failed to fetch alumni",
        create: "Failed to save alumni",
        update: "Failed to update alumni",
        delete: "Failed to delete alumni",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn build(id: i64, created_at: DateTime<Utc>, new: NewAlumniProfile) -> Self {
        AlumniProfile {
            id,
            name: new.name,
            year: new.year,
            position: new.position,
            visible: new.visible,
            image: new.image,
            created_at,
        }
    }

    fn columns(&self) -> Vec<(&'static str, Column)> {
        vec![
            ("name", self.name.clone().into()),
            ("year", self.year.clone().into()),
            ("position", self.position.clone().into()),
            ("visible", self.visible.into()),
            ("image", self.image.clone().into()),
            ("created_at", self.created_at.into()),
        ]
    }

    fn apply(&mut self, patch: &AlumniPatch) {
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
    }

    fn patch_columns(patch: &AlumniPatch) -> Vec<(&'static str, Column)> {
        patch
            .visible
            .map(|visible| ("visible", Column::from(visible)))
            .into_iter()
            .collect()
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        b.year.cmp(&a.year).then(b.id.cmp(&a.id))
    }
}
