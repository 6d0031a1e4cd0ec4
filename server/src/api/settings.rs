//! Settings endpoint

use axum::{
    extract::State,
    response::{IntoResponse, Json as ResponseJson, Response},
};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::handlers::AppJson;
use super::response::{error_response, ok_or_internal_error};
use crate::resources::{Settings, SettingsInput};
use crate::services::SettingsService;

#[derive(Serialize)]
pub struct SettingsSaved {
    pub message: &'static str,
    pub settings: Settings,
}

/// The settings record, or `{}` before the first save
pub async fn get_settings(State(settings): State<SettingsService>) -> Response {
    match settings.current().await {
        Ok(Some(current)) => ResponseJson(current).into_response(),
        Ok(None) => ResponseJson(json!({})).into_response(),
        Err(e) => error_response(e, "Failed to load settings"),
    }
}

pub async fn save_settings(
    State(settings): State<SettingsService>,
    AppJson(input): AppJson<SettingsInput>,
) -> impl IntoResponse {
    info!("Saving site settings");

    let result = settings.save(input).await.map(|saved| SettingsSaved {
        message: "Settings saved successfully",
        settings: saved,
    });
    ok_or_internal_error(result, "Failed to save settings")
}
