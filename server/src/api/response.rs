//! Shared response helpers
//!
//! Every endpoint answers with either the payload itself or
//! `{"error": "<message>"}`. Server-side failures are logged and reported
//! with the endpoint's own static message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::error::{AppError, Result};

/// Error body for a failed operation
pub fn error_response(error: AppError, message: &str) -> Response {
    let status = error.status();
    if !error.is_client_error() {
        tracing::error!("{}: {}", message, error);
    }

    (status, ResponseJson(json!({ "error": error.public_message(message) }))).into_response()
}

/// 200 with the payload, or the mapped error
pub fn ok_or_internal_error<T: Serialize>(result: Result<T>, message: &str) -> Response {
    match result {
        Ok(data) => (StatusCode::OK, ResponseJson(data)).into_response(),
        Err(e) => error_response(e, message),
    }
}

/// 201 with the created record, or the mapped error
pub fn created_or_internal_error<T: Serialize>(result: Result<T>, message: &str) -> Response {
    match result {
        Ok(data) => (StatusCode::CREATED, ResponseJson(data)).into_response(),
        Err(e) => error_response(e, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let ok = ok_or_internal_error(Ok(vec![1, 2, 3]), "Failed to fetch news");
        assert_eq!(ok.status(), StatusCode::OK);

        let created = created_or_internal_error(Ok("record"), "Failed to save news");
        assert_eq!(created.status(), StatusCode::CREATED);

        let missing: Result<()> = Err(AppError::not_found("News", 4));
        assert_eq!(
            ok_or_internal_error(missing, "Failed to update news").status(),
            StatusCode::NOT_FOUND
        );

        let broken: Result<()> = Err(AppError::Generic("disk full".to_string()));
        assert_eq!(
            created_or_internal_error(broken, "Failed to save news").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
