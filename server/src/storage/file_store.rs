//! File-backed stores
//!
//! Each collection lives in a single pretty-printed JSON array at
//! `<data_dir>/<collection>.json`. Every operation loads the whole
//! document, changes it in memory and writes the whole document back.
//!
//! A per-store mutex serialises the read-modify-write cycle so concurrent
//! requests cannot overwrite each other's changes.

use super::resource::Resource;
use super::{SettingsStore, Store};
use crate::error::{AppError, Result};
use crate::resources::{Settings, SettingsInput};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Whole-document JSON store for one resource
pub struct FileStore<R> {
    path: PathBuf,
    lock: Mutex<()>,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> FileStore<R> {
    /// Store for `R` inside `data_dir`
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(format!("{}.json", R::COLLECTION)),
            lock: Mutex::new(()),
            _resource: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the collection. A missing or empty document is an empty collection.
    async fn read_all(&self) -> Result<Vec<R>> {
        if !fs::try_exists(&self.path).await? {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<R> = serde_json::from_str(&content).map_err(|e| {
            AppError::Generic(format!("Failed to parse {:?}: {}", self.path, e))
        })?;

        tracing::debug!("Loaded {} {} records", records.len(), R::COLLECTION);
        Ok(records)
    }

    async fn write_all(&self, records: &[R]) -> Result<()> {
        write_document(&self.path, records).await?;
        tracing::debug!("Wrote {} {} records", records.len(), R::COLLECTION);
        Ok(())
    }
}

/// Timestamp id, bumped past the current maximum so ids stay unique and increasing.
fn next_id<R: Resource>(records: &[R], now_millis: i64) -> i64 {
    match records.iter().map(|record| record.id()).max() {
        Some(max) if max >= now_millis => max + 1,
        _ => now_millis,
    }
}

#[async_trait]
impl<R: Resource> Store<R> for FileStore<R> {
    async fn list(&self) -> Result<Vec<R>> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        records.sort_by(R::ordering);
        Ok(records)
    }

    async fn get(&self, id: i64) -> Result<R> {
        let _guard = self.lock.lock().await;

        self.read_all()
            .await?
            .into_iter()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::not_found(R::NAME, id))
    }

    async fn insert(&self, new: R::New, created_at: DateTime<Utc>) -> Result<R> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        let id = next_id(&records, Utc::now().timestamp_millis());
        let record = R::build(id, created_at, new);

        records.push(record.clone());
        self.write_all(&records).await?;

        tracing::debug!("Created {} record: {}", R::COLLECTION, record.id());
        Ok(record)
    }

    async fn update_fields(&self, id: i64, patch: &R::Patch) -> Result<R> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        let record = records
            .iter_mut()
            .find(|record| record.id() == id)
            .ok_or_else(|| AppError::not_found(R::NAME, id))?;

        record.check_patch(patch)?;
        record.apply(patch);
        let updated = record.clone();
        self.write_all(&records).await?;

        tracing::debug!("Updated {} record: {}", R::COLLECTION, id);
        Ok(updated)
    }

    async fn delete_by_id(&self, id: i64) -> Result<()> {
        let _guard = self.lock.lock().await;

        let mut records = self.read_all().await?;
        let before = records.len();
        records.retain(|record| record.id() != id);

        if records.len() == before {
            return Err(AppError::not_found(R::NAME, id));
        }

        self.write_all(&records).await?;

        tracing::debug!("Deleted {} record: {}", R::COLLECTION, id);
        Ok(())
    }
}

/// Settings kept as a single JSON object
pub struct FileSettingsStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn load(&self) -> Result<Option<Settings>> {
        let _guard = self.lock.lock().await;

        if !fs::try_exists(&self.path).await? {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        // Documents written before the current layout use the form's field names.
        let settings = match serde_json::from_str::<Settings>(&content) {
            Ok(settings) => settings,
            Err(_) => serde_json::from_str::<SettingsInput>(&content)
                .map_err(|e| AppError::Generic(format!("Failed to parse settings: {}", e)))?
                .into_settings(Utc::now()),
        };

        Ok(Some(settings))
    }

    async fn save(&self, settings: Settings) -> Result<Settings> {
        let _guard = self.lock.lock().await;

        write_document(&self.path, &settings).await?;
        tracing::info!("Settings saved to {:?}", self.path);

        Ok(settings)
    }
}

/// Write a JSON document through a temp file so readers never see a partial write.
async fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path).await?;
    file.write_all(content.as_bytes()).await?;
    file.sync_all().await?;

    fs::rename(&temp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::{AlumniPatch, AlumniProfile, NewAlumniProfile};
    use tempfile::TempDir;

    fn create_test_store() -> (FileStore<AlumniProfile>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        (store, temp_dir)
    }

    fn alumni(name: &str, year: &str) -> NewAlumniProfile {
        NewAlumniProfile {
            name: name.to_string(),
            year: year.to_string(),
            position: "Lecturer".to_string(),
            visible: true,
            image: None,
        }
    }

    #[tokio::test]
    async fn test_missing_document_is_empty() {
        let (store, _temp) = create_test_store();

        assert!(store.list().await.unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_ids_are_unique_and_increasing() {
        let (store, _temp) = create_test_store();

        let first = store.create(alumni("A", "2010")).await.unwrap();
        let second = store.create(alumni("B", "2010")).await.unwrap();
        let third = store.create(alumni("C", "2010")).await.unwrap();

        assert!(second.id > first.id);
        assert!(third.id > second.id);
    }

    #[tokio::test]
    async fn test_document_is_pretty_printed_array() {
        let (store, _temp) = create_test_store();
        store.create(alumni("Fatima Zahra", "2012")).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n"));

        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["name"], "Fatima Zahra");
        assert_eq!(parsed[0]["visible"], true);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (store, _temp) = create_test_store();
        let created = store.create(alumni("Usthad Kareem", "2008")).await.unwrap();

        let patch = AlumniPatch {
            visible: Some(false),
        };
        let updated = store.update_fields(created.id, &patch).await.unwrap();
        assert!(!updated.visible);
        assert_eq!(updated.name, created.name);

        store.delete_by_id(created.id).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());

        let err = store.delete_by_id(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_concurrent_creates_are_not_lost() {
        let temp_dir = TempDir::new().unwrap();
        let store = std::sync::Arc::new(FileStore::<AlumniProfile>::new(temp_dir.path()));

        let mut handles = Vec::new();
        for i in 0..10 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.create(alumni(&format!("Alum {}", i), "2015")).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(store.list().await.unwrap().len(), 10);
    }

    #[tokio::test]
    async fn test_corrupt_document_is_an_error() {
        let (store, _temp) = create_test_store();
        std::fs::write(store.path(), "{ not json").unwrap();

        assert!(store.list().await.is_err());
    }

    #[tokio::test]
    async fn test_settings_legacy_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{"institutionName": "Darul Huda", "phone": "123", "socials": {"facebook": "fb"}}"#,
        )
        .unwrap();

        let store = FileSettingsStore::new(path);
        let settings = store.load().await.unwrap().unwrap();
        assert_eq!(settings.institution_name, "Darul Huda");
        assert_eq!(settings.facebook, "fb");

        let saved = store
            .save(SettingsInput::default().into_settings(Utc::now()))
            .await
            .unwrap();
        assert_eq!(store.load().await.unwrap(), Some(saved));
    }
}
