// libs/appointment-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use notification_cell::Notify;
use shared_database::PostgrestClient;
use shared_models::error::AppError;

use crate::models::{AppointmentError, CreateAppointmentRequest, UpdateAppointmentRequest};
use crate::repository::AppointmentRepository;
use crate::services::availability::AvailabilityEngine;
use crate::services::booking::BookingService;

/// Shared state for the appointment routes: the store handle plus the
/// notification capability injected at startup.
#[derive(Clone)]
pub struct AppointmentCellState {
    pub db: Arc<PostgrestClient>,
    pub notifier: Arc<dyn Notify>,
}

fn map_err(e: AppointmentError) -> AppError {
    match e {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::MissingFields(fields) => AppError::MissingFields(fields),
        AppointmentError::InvalidFormat(msg) => AppError::InvalidFormat(msg),
        AppointmentError::PastDate => AppError::PastDate,
        AppointmentError::InvalidStatus(status) => AppError::InvalidStatus(status),
        AppointmentError::SlotTaken => {
            AppError::Conflict("Appointment slot is no longer available".to_string())
        }
        AppointmentError::DatabaseError(msg) => AppError::Database(msg),
    }
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppointmentCellState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let service = BookingService::new(state.db.clone(), state.notifier.clone());

    let appointment = service.create(request).await.map_err(map_err)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Appointment created successfully",
            "appointment": appointment,
        })),
    ))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let repo = AppointmentRepository::new(state.db.clone());

    let appointments = repo.list_all().await.map_err(map_err)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let repo = AppointmentRepository::new(state.db.clone());

    let appointment = repo.get(appointment_id).await.map_err(map_err)?;

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn update_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<i64>,
    Json(request): Json<UpdateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.db.clone(), state.notifier.clone());

    let appointment = service.update(appointment_id, request).await.map_err(map_err)?;

    Ok(Json(json!({
        "message": "Appointment updated",
        "appointment": appointment,
    })))
}

#[axum::debug_handler]
pub async fn delete_appointment(
    State(state): State<AppointmentCellState>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state.db.clone(), state.notifier.clone());

    service.delete(appointment_id).await.map_err(map_err)?;

    Ok(Json(json!({ "message": "Appointment deleted" })))
}

#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<AppointmentCellState>,
) -> Result<Json<Value>, AppError> {
    let repo = AppointmentRepository::new(state.db.clone());
    let engine = AvailabilityEngine::new(&repo);

    let slots = engine.available_slots().await.map_err(map_err)?;

    Ok(Json(json!(slots)))
}
