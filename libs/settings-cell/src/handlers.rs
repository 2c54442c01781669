// libs/settings-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::PostgrestClient;
use shared_models::error::AppError;

use crate::models::{BulkSettingsRequest, SettingRequest, SettingsError};
use crate::services::SettingsService;

fn map_err(e: SettingsError) -> AppError {
    match e {
        SettingsError::NotFound => AppError::NotFound("Setting not found".to_string()),
        SettingsError::EmptyKey => {
            AppError::InvalidValue("Setting key must not be empty".to_string())
        }
        SettingsError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn list_settings(
    State(db): State<Arc<PostgrestClient>>,
) -> Result<Json<Value>, AppError> {
    let service = SettingsService::new(db);

    let settings = service.list_all().await.map_err(map_err)?;

    Ok(Json(json!(settings)))
}

#[axum::debug_handler]
pub async fn get_setting(
    State(db): State<Arc<PostgrestClient>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = SettingsService::new(db);

    let setting = service.get(&key).await.map_err(map_err)?;

    Ok(Json(json!(setting)))
}

#[axum::debug_handler]
pub async fn upsert_setting(
    State(db): State<Arc<PostgrestClient>>,
    Json(request): Json<SettingRequest>,
) -> Result<Json<Value>, AppError> {
    let service = SettingsService::new(db);

    let key = request.key.as_deref().unwrap_or("");
    let setting = service
        .set_value(key, request.value.as_deref(), request.description.as_deref())
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "message": "Setting saved",
        "setting": setting,
    })))
}

#[axum::debug_handler]
pub async fn delete_setting(
    State(db): State<Arc<PostgrestClient>>,
    Path(key): Path<String>,
) -> Result<Json<Value>, AppError> {
    let service = SettingsService::new(db);

    service.delete(&key).await.map_err(map_err)?;

    Ok(Json(json!({ "message": "Setting deleted" })))
}

#[axum::debug_handler]
pub async fn bulk_update_settings(
    State(db): State<Arc<PostgrestClient>>,
    Json(request): Json<BulkSettingsRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = SettingsService::new(db);

    let saved = service.set_bulk(&request.settings).await.map_err(map_err)?;

    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Settings saved",
            "updated": saved.len(),
            "settings": saved,
        })),
    ))
}
