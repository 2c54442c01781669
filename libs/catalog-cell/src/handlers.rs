// libs/catalog-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use shared_database::PostgrestClient;
use shared_models::error::AppError;

use crate::models::{CatalogError, CategoryRequest, ServiceRequest};
use crate::services::CatalogService;

fn map_err(e: CatalogError) -> AppError {
    match e {
        CatalogError::CategoryNotFound => AppError::NotFound("Category not found".to_string()),
        CatalogError::ServiceNotFound => AppError::NotFound("Service not found".to_string()),
        CatalogError::DuplicateCategoryName => {
            AppError::Conflict("A category with this name already exists".to_string())
        }
        CatalogError::CategoryHasServices => AppError::HasDependents(
            "Remove or move services before deleting the category".to_string(),
        ),
        CatalogError::InvalidValue(msg) => AppError::InvalidValue(msg),
        CatalogError::MissingFields(fields) => AppError::MissingFields(fields),
        CatalogError::DatabaseError(msg) => AppError::Database(msg),
    }
}

// ==============================================================================
// CATEGORY HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_categories(
    State(db): State<Arc<PostgrestClient>>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let categories = service.list_categories().await.map_err(map_err)?;

    Ok(Json(json!(categories)))
}

#[axum::debug_handler]
pub async fn get_category(
    State(db): State<Arc<PostgrestClient>>,
    Path(category_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let category = service.get_category(category_id).await.map_err(map_err)?;

    Ok(Json(json!(category)))
}

#[axum::debug_handler]
pub async fn create_category(
    State(db): State<Arc<PostgrestClient>>,
    Json(request): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = CatalogService::new(db);

    let category = service.create_category(request).await.map_err(map_err)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Category created successfully",
            "category": category,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_category(
    State(db): State<Arc<PostgrestClient>>,
    Path(category_id): Path<i64>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let category = service
        .update_category(category_id, request)
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "message": "Category updated",
        "category": category,
    })))
}

#[axum::debug_handler]
pub async fn delete_category(
    State(db): State<Arc<PostgrestClient>>,
    Path(category_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    service.delete_category(category_id).await.map_err(map_err)?;

    Ok(Json(json!({ "message": "Category deleted" })))
}

// ==============================================================================
// SERVICE HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_services(
    State(db): State<Arc<PostgrestClient>>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let services = service.list_services().await.map_err(map_err)?;

    Ok(Json(json!(services)))
}

#[axum::debug_handler]
pub async fn get_service(
    State(db): State<Arc<PostgrestClient>>,
    Path(service_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let found = service.get_service(service_id).await.map_err(map_err)?;

    Ok(Json(json!(found)))
}

#[axum::debug_handler]
pub async fn create_service(
    State(db): State<Arc<PostgrestClient>>,
    Json(request): Json<ServiceRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = CatalogService::new(db);

    let created = service.create_service(request).await.map_err(map_err)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Service created successfully",
            "service": created,
        })),
    ))
}

#[axum::debug_handler]
pub async fn update_service(
    State(db): State<Arc<PostgrestClient>>,
    Path(service_id): Path<i64>,
    Json(request): Json<ServiceRequest>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    let updated = service
        .update_service(service_id, request)
        .await
        .map_err(map_err)?;

    Ok(Json(json!({
        "message": "Service updated",
        "service": updated,
    })))
}

#[axum::debug_handler]
pub async fn delete_service(
    State(db): State<Arc<PostgrestClient>>,
    Path(service_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = CatalogService::new(db);

    service.delete_service(service_id).await.map_err(map_err)?;

    Ok(Json(json!({ "message": "Service deleted" })))
}
