//! Error types for the institute site backend
//!
//! All errors use thiserror for structured error handling.
//! Client errors (bad input, unknown ids) carry their own message; every
//! other variant is reported to callers as a generic failure.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{0} is required")]
    MissingParameter(&'static str),

    #[error("Invalid {0}")]
    InvalidParameter(&'static str),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid status change: {0}")]
    InvalidTransition(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("{0}")]
    Generic(String),
}

impl AppError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        AppError::NotFound { resource, id }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MissingParameter(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidPayload(_)
            | AppError::InvalidTransition(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for errors caused by the caller rather than by the server.
    pub fn is_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    /// Message safe to show to callers.
    ///
    /// Server-side failures never expose their detail; `fallback` is the
    /// static message the endpoint wants shown instead.
    pub fn public_message(&self, fallback: &str) -> String {
        match self {
            AppError::NotFound { resource, .. } => format!("{} not found", resource),
            AppError::MissingParameter(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidTransition(_) => self.to_string(),
            AppError::InvalidPayload(_) => "Invalid request body".to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !self.is_client_error() {
            tracing::error!("Request failed: {}", self);
        }

        let body = Json(json!({ "error": self.public_message("Internal server error") }));
        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
