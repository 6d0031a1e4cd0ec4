//! Contact form messages

use crate::config::MESSAGE_DATE_FORMAT;
use crate::storage::resource::{newest_first, Column, FailureMessages, Resource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::cmp::Ordering;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    /// Day the message was received (YYYY-MM-DD)
    pub date: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessagePatch {
    #[serde(default)]
    pub read: Option<bool>,
}

impl Resource for ContactMessage {
    type New = NewContactMessage;
    type Patch = MessagePatch;

    const NAME: &'static str = "Message";
    const COLLECTION: &'static str = "messages";
    const ORDER_BY: &'static str = "created_at DESC, id DESC";
    const PATCHABLE: bool = true;
    const DELETABLE: bool = true;
    const FAILURES: FailureMessages = FailureMessages {
        list: "Failed to fetch messages",
        create: "Failed to send message",
        update: "Failed to update message",
        delete: "Failed to delete message",
    };

    fn id(&self) -> i64 {
        self.id
    }

    fn build(id: i64, created_at: DateTime<Utc>, new: NewContactMessage) -> Self {
        ContactMessage {
            id,
            name: new.name,
            email: new.email,
            subject: new.subject,
            message: new.message,
            date: created_at.format(MESSAGE_DATE_FORMAT).to_string(),
            read: false,
            created_at,
        }
    }

    fn columns(&self) -> Vec<(&'static str, Column)> {
        vec![
            ("name", self.name.clone().into()),
            ("email", self.email.clone().into()),
            ("subject", self.subject.clone().into()),
            ("message", self.message.clone().into()),
            ("date", self.date.clone().into()),
            ("read", self.read.into()),
            ("created_at", self.created_at.into()),
        ]
    }

    fn apply(&mut self, patch: &MessagePatch) {
        if let Some(read) = patch.read {
            self.read = read;
        }
    }

    fn patch_columns(patch: &MessagePatch) -> Vec<(&'static str, Column)> {
        patch
            .read
            .map(|read| ("read", Column::from(read)))
            .into_iter()
            .collect()
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        newest_first((a.created_at, a.id), (b.created_at, b.id))
    }
}
