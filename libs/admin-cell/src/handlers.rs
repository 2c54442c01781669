// libs/admin-cell/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, Json};
use chrono::Local;
use serde_json::{json, Value};

use appointment_cell::AppointmentRepository;
use catalog_cell::CatalogRepository;
use shared_database::PostgrestClient;
use shared_models::error::AppError;

use crate::services::build_summary;

#[axum::debug_handler]
pub async fn get_admin_summary(
    State(db): State<Arc<PostgrestClient>>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentRepository::new(db.clone())
        .list_all()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let services = CatalogRepository::new(db)
        .list_services()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let summary = build_summary(&appointments, &services, Local::now().naive_local());

    Ok(Json(json!(summary)))
}

#[axum::debug_handler]
pub async fn health_check(
    State(db): State<Arc<PostgrestClient>>,
) -> Result<Json<Value>, AppError> {
    let appointments = AppointmentRepository::new(db.clone())
        .list_all()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let catalog = CatalogRepository::new(db);
    let categories = catalog
        .list_categories()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    let services = catalog
        .list_services()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "status": "ok",
        "timestamp": Local::now().naive_local(),
        "counts": {
            "categories": categories.len(),
            "services": services.len(),
            "appointments": appointments.len(),
        },
    })))
}
