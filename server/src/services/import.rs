//! Legacy data import and demo seeding
//!
//! Moves records out of the JSON documents written by the file-backed store
//! (or by older revisions of the site) into whichever store is configured.
//! Records get fresh ids from the target store but keep their recorded
//! `createdAt`; legacy field names are reconciled by each resource's create
//! payload.

use crate::app::AppState;
use crate::config::{MESSAGE_DATE_FORMAT, SETTINGS_FILE_NAME};
use crate::error::{AppError, Result};
use crate::resources::{
    AdmissionPatch, AdmissionStatus, AlumniPatch, MessagePatch, NewAlumniProfile,
    NewContactMessage, NewNewsItem, NewsStatus, SettingsInput,
};
use crate::services::ResourceService;
use crate::storage::Resource;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tokio::fs;

/// Counts for one imported collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CollectionReport {
    pub imported: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub admissions: CollectionReport,
    pub alumni: CollectionReport,
    pub news: CollectionReport,
    pub publications: CollectionReport,
    pub messages: CollectionReport,
    pub settings: bool,
}

/// Read `<dir>/<collection>.json` as raw entries. A missing file yields nothing.
async fn read_legacy(dir: &Path, collection: &str) -> Result<Vec<Value>> {
    let path = dir.join(format!("{}.json", collection));
    if !fs::try_exists(&path).await? {
        tracing::info!("No legacy {} document at {:?}, skipping", collection, path);
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(&path).await?;
    match serde_json::from_str::<Value>(&content)? {
        Value::Array(entries) => Ok(entries),
        _ => Err(AppError::InvalidPayload(format!(
            "{:?} does not contain a JSON array",
            path
        ))),
    }
}

/// Creation time recorded in a legacy entry, if it carries a readable one.
fn legacy_created_at(entry: &Value) -> Option<DateTime<Utc>> {
    let raw = entry.get("createdAt")?.as_str()?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Ignoring unreadable createdAt {:?}: {}", raw, e);
            None
        }
    }
}

/// Create one record from a legacy entry; entries that do not fit are skipped.
async fn import_entry<R: Resource>(
    service: &ResourceService<R>,
    entry: Value,
    report: &mut CollectionReport,
) -> Result<Option<R>> {
    let created_at = legacy_created_at(&entry).unwrap_or_else(Utc::now);
    let new = match serde_json::from_value::<R::New>(entry) {
        Ok(new) => new,
        Err(e) => {
            tracing::warn!("Skipping legacy {} entry: {}", R::COLLECTION, e);
            report.skipped += 1;
            return Ok(None);
        }
    };

    let record = service.create_at(new, created_at).await?;
    report.imported += 1;
    Ok(Some(record))
}

async fn import_collection<R: Resource>(
    service: &ResourceService<R>,
    dir: &Path,
) -> Result<CollectionReport> {
    let mut report = CollectionReport::default();
    for entry in read_legacy(dir, R::COLLECTION).await? {
        import_entry(service, entry, &mut report).await?;
    }
    Ok(report)
}

/// Admissions keep the decision recorded in the legacy document.
async fn import_admissions(state: &AppState, dir: &Path) -> Result<CollectionReport> {
    let mut report = CollectionReport::default();

    for entry in read_legacy(dir, "admissions").await? {
        let status = entry
            .get("status")
            .cloned()
            .and_then(|status| serde_json::from_value::<AdmissionStatus>(status).ok())
            .unwrap_or_default();

        let Some(admission) = import_entry(&state.admissions, entry, &mut report).await? else {
            continue;
        };

        if status != AdmissionStatus::Pending {
            state
                .admissions
                .update(admission.id, AdmissionPatch { status: Some(status) })
                .await?;
        }
    }

    Ok(report)
}

/// Messages keep their read flag.
async fn import_messages(state: &AppState, dir: &Path) -> Result<CollectionReport> {
    let mut report = CollectionReport::default();

    for entry in read_legacy(dir, "messages").await? {
        let read = entry.get("read").and_then(Value::as_bool).unwrap_or(false);

        let Some(message) = import_entry(&state.messages, entry, &mut report).await? else {
            continue;
        };

        if read {
            state
                .messages
                .update(message.id, MessagePatch { read: Some(true) })
                .await?;
        }
    }

    Ok(report)
}

/// Import every legacy document found in `dir`.
pub async fn import_legacy(state: &AppState, dir: &Path) -> Result<ImportReport> {
    tracing::info!("Importing legacy documents from {:?}", dir);

    let mut report = ImportReport {
        admissions: import_admissions(state, dir).await?,
        alumni: import_collection(&state.alumni, dir).await?,
        news: import_collection(&state.news, dir).await?,
        publications: import_collection(&state.publications, dir).await?,
        messages: import_messages(state, dir).await?,
        settings: false,
    };

    let settings_path = dir.join(SETTINGS_FILE_NAME);
    if fs::try_exists(&settings_path).await? {
        let content = fs::read_to_string(&settings_path).await?;
        let input: SettingsInput = serde_json::from_str(&content)?;
        state.settings.save(input).await?;
        report.settings = true;
    }

    tracing::info!("Legacy import finished: {:?}", report);
    Ok(report)
}

/// Insert the demo news items, alumni profiles and messages.
pub async fn seed_demo(state: &AppState) -> Result<ImportReport> {
    let mut report = ImportReport::default();

    let news = [
        ("Annual Islamic Conference 2025", "2025-10-15", "Events", NewsStatus::Published),
        ("Admissions Open for Academic Year 2026", "2025-09-01", "Admissions", NewsStatus::Published),
        ("New Library Wing Inaugurated", "2025-08-20", "Campus", NewsStatus::Draft),
    ];
    for (title, date, category, status) in news {
        state
            .news
            .create(NewNewsItem {
                title: title.to_string(),
                date: date.to_string(),
                category: category.to_string(),
                status,
                content: None,
                image: None,
            })
            .await?;
        report.news.imported += 1;
    }

    let alumni = [
        ("Dr. Ahmed Bilal", "2010", "Senior Researcher", true),
        ("Fatima Zahra", "2012", "Software Engineer", true),
        ("Usthad Kareem", "2008", "Imam & Khatib", false),
    ];
    for (name, year, position, visible) in alumni {
        let profile = state
            .alumni
            .create(NewAlumniProfile {
                name: name.to_string(),
                year: year.to_string(),
                position: position.to_string(),
                visible: true,
                image: None,
            })
            .await?;
        if !visible {
            state
                .alumni
                .update(profile.id, AlumniPatch { visible: Some(false) })
                .await?;
        }
        report.alumni.imported += 1;
    }

    let messages = [
        ("John Doe", "john@example.com", "Admission Inquiry", "I would like to know the fee structure for the Hifz course.", "2025-10-10", false),
        ("Jane Smith", "jane@example.com", "Volunteering Opportunity", "Are there any openings for teaching English on weekends?", "2025-10-09", true),
        ("Ali Kahn", "ali@example.com", "Donation", "I want to contribute to the library fund. Please guide me.", "2025-10-08", false),
    ];
    for (name, email, subject, message, date, read) in messages {
        let received = NaiveDate::parse_from_str(date, MESSAGE_DATE_FORMAT)
            .map_err(|e| AppError::Generic(format!("Invalid demo message date {}: {}", date, e)))?
            .and_time(NaiveTime::MIN)
            .and_utc();
        let created = state
            .messages
            .create_at(
                NewContactMessage {
                    name: name.to_string(),
                    email: email.to_string(),
                    subject: subject.to_string(),
                    message: message.to_string(),
                },
                received,
            )
            .await?;
        if read {
            state
                .messages
                .update(created.id, MessagePatch { read: Some(true) })
                .await?;
        }
        report.messages.imported += 1;
    }

    tracing::info!("Demo data seeded");
    Ok(report)
}
