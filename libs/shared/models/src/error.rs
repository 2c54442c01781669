use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Request-level error taxonomy shared by every cell.
///
/// Validation variants are raised before any mutation is attempted;
/// `Database` is the only 5xx and its detail stays server-side.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing required fields")]
    MissingFields(Vec<String>),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Cannot book an appointment in the past")]
    PastDate,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("{0}")]
    HasDependents(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing required fields",
                    "fields": fields,
                }),
            ),
            AppError::InvalidFormat(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::PastDate => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Cannot book an appointment in the past" }),
            ),
            AppError::InvalidStatus(_) => {
                (StatusCode::BAD_REQUEST, json!({ "error": "Invalid status" }))
            }
            AppError::InvalidValue(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::HasDependents(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, json!({ "error": msg }))
            }
            // Persistence detail is logged, never sent to the client.
            AppError::Database(_) | AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "An internal error occurred" }),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {}: {}", status, self);
        } else {
            tracing::debug!("Error: {}: {}", status, self);
        }

        (status, Json(body)).into_response()
    }
}
