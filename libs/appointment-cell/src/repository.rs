// libs/appointment-cell/src/repository.rs
use std::sync::Arc;

use chrono::NaiveDateTime;
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;

use shared_database::PostgrestClient;

use crate::models::{Appointment, AppointmentError, AppointmentStatus, NewAppointment};

const TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Persistence boundary for appointment rows. All methods issue PostgREST
/// queries; transport failures surface as `DatabaseError` and abort the
/// calling operation.
pub struct AppointmentRepository {
    db: Arc<PostgrestClient>,
}

impl AppointmentRepository {
    pub fn new(db: Arc<PostgrestClient>) -> Self {
        Self { db }
    }

    /// All appointments, most recent appointment instant first.
    pub async fn list_all(&self) -> Result<Vec<Appointment>, AppointmentError> {
        let path = "/appointments?order=appointment_date.desc";
        let result: Vec<Value> = self
            .db
            .request(Method::GET, path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_rows(result)
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, AppointmentError> {
        let path = format!("/appointments?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        parse_row(row)
    }

    /// Active (pending/confirmed) appointments whose instant falls within
    /// the half-open range `[start, end)`. Used by the availability engine.
    pub async fn find_active_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, AppointmentError> {
        let path = format!(
            "/appointments?status=in.(pending,confirmed)&appointment_date=gte.{}&appointment_date=lt.{}&order=appointment_date.asc",
            start.format(TS_FORMAT),
            end.format(TS_FORMAT),
        );
        debug!("Fetching active appointments in range {} .. {}", start, end);

        let result: Vec<Value> = self
            .db
            .request(Method::GET, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        parse_rows(result)
    }

    /// Conflict-checked insert through the `book_appointment` store function,
    /// which locks the slot-hour window and inserts within one transaction.
    /// An empty result means another booking won the race.
    pub async fn book(&self, new: NewAppointment) -> Result<Appointment, AppointmentError> {
        let body = json!({
            "p_name": new.name,
            "p_email": new.email,
            "p_phone": new.phone,
            "p_service": new.service,
            "p_service_id": new.service_id,
            "p_appointment_date": new.appointment_date.format(TS_FORMAT).to_string(),
            "p_message": new.message,
        });

        let result: Vec<Value> = self
            .db
            .request(Method::POST, "/rpc/book_appointment", Some(body))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AppointmentError::SlotTaken)?;
        parse_row(row)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        let path = format!("/appointments?id=eq.{}", id);
        let body = json!({ "status": status.to_string() });

        let result: Vec<Value> = self
            .db
            .request_returning(Method::PATCH, &path, Some(body))
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        let row = result.into_iter().next().ok_or(AppointmentError::NotFound)?;
        parse_row(row)
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        let path = format!("/appointments?id=eq.{}", id);
        let result: Vec<Value> = self
            .db
            .request_returning(Method::DELETE, &path, None)
            .await
            .map_err(|e| AppointmentError::DatabaseError(e.to_string()))?;

        if result.is_empty() {
            return Err(AppointmentError::NotFound);
        }
        Ok(())
    }
}

fn parse_row(row: Value) -> Result<Appointment, AppointmentError> {
    serde_json::from_value(row)
        .map_err(|e| AppointmentError::DatabaseError(format!("Failed to parse appointment: {}", e)))
}

fn parse_rows(rows: Vec<Value>) -> Result<Vec<Appointment>, AppointmentError> {
    rows.into_iter().map(parse_row).collect()
}
