//! Generic CRUD handlers
//!
//! One handler set serves every resource; the router instantiates it per
//! resource with that resource's service as state.

use axum::{
    extract::{FromRequest, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::response::{created_or_internal_error, ok_or_internal_error};
use crate::error::{AppError, Result};
use crate::services::ResourceService;
use crate::storage::Resource;

/// JSON body extractor whose rejections become [`AppError`]s
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Record id as sent by clients: a number or a numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn resolve(self) -> Result<i64> {
        match self {
            RecordId::Number(id) => Ok(id),
            RecordId::Text(text) => {
                let text = text.trim();
                if text.is_empty() {
                    return Err(AppError::MissingParameter("ID"));
                }
                text.parse().map_err(|_| AppError::InvalidParameter("ID"))
            }
        }
    }
}

/// Partial update body: the record id plus the patched fields
#[derive(Debug, Deserialize)]
pub struct PatchRequest<P> {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub patch: P,
}

#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: Option<String>,
}

impl DeleteParams {
    pub fn id(self) -> Result<i64> {
        match self.id {
            Some(id) => RecordId::Text(id).resolve(),
            None => Err(AppError::MissingParameter("ID")),
        }
    }
}

pub async fn list<R: Resource>(State(service): State<ResourceService<R>>) -> impl IntoResponse {
    tracing::debug!("Listing {}", R::COLLECTION);

    ok_or_internal_error(service.list().await, R::FAILURES.list)
}

pub async fn create<R: Resource>(
    State(service): State<ResourceService<R>>,
    AppJson(new): AppJson<R::New>,
) -> impl IntoResponse {
    created_or_internal_error(service.create(new).await, R::FAILURES.create)
}

pub async fn update<R: Resource>(
    State(service): State<ResourceService<R>>,
    AppJson(request): AppJson<PatchRequest<R::Patch>>,
) -> impl IntoResponse {
    let result = match request.id {
        Some(id) => match id.resolve() {
            Ok(id) => service.update(id, request.patch).await,
            Err(e) => Err(e),
        },
        None => Err(AppError::MissingParameter("ID")),
    };

    ok_or_internal_error(result, R::FAILURES.update)
}

pub async fn delete<R: Resource>(
    State(service): State<ResourceService<R>>,
    Query(params): Query<DeleteParams>,
) -> impl IntoResponse {
    let result = match params.id() {
        Ok(id) => {
            info!("Deleting {} {}", R::NAME, id);
            service
                .delete(id)
                .await
                .map(|()| json!({ "message": format!("{} deleted", R::NAME) }))
        }
        Err(e) => Err(e),
    };

    ok_or_internal_error(result, R::FAILURES.delete)
}
