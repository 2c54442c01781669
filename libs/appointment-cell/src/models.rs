// libs/appointment-cell/src/models.rs
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// A persisted booking. `service` keeps the free-text snapshot from the
/// request; `service_id` is the catalog foreign key when the name resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    #[serde(default)]
    pub service_id: Option<i64>,
    pub appointment_date: NaiveDateTime,
    pub message: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl AppointmentStatus {
    /// Statuses that occupy a slot for conflict purposes.
    pub fn is_active(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(AppointmentError::InvalidStatus(other.to_string())),
        }
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

/// Raw booking request body. Everything arrives as optional strings so the
/// lifecycle manager can report every missing field at once after trimming.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateAppointmentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub datetime: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentRequest {
    pub status: Option<String>,
}

/// Validated, normalized creation payload handed to the repository.
#[derive(Debug, Clone, Serialize)]
pub struct NewAppointment {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub service_id: Option<i64>,
    pub appointment_date: NaiveDateTime,
    pub message: Option<String>,
}

// ==============================================================================
// AVAILABILITY MODELS
// ==============================================================================

/// A derived one-hour bookable window. Never persisted; recomputed per query.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct AvailableSlot {
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_slot_time")]
    pub time: NaiveTime,
    pub datetime: NaiveDateTime,
}

impl AvailableSlot {
    pub fn new(date: NaiveDate, time: NaiveTime) -> Self {
        Self {
            date,
            time,
            datetime: date.and_time(time),
        }
    }

    /// End of the slot's half-open `[start, end)` interval.
    pub fn end(&self) -> NaiveDateTime {
        self.datetime + chrono::Duration::hours(1)
    }
}

fn serialize_slot_time<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&time.format("%H:%M").to_string())
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum AppointmentError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Missing required fields: {0:?}")]
    MissingFields(Vec<String>),

    #[error("{0}")]
    InvalidFormat(String),

    #[error("Cannot book an appointment in the past")]
    PastDate,

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Appointment slot is no longer available")]
    SlotTaken,

    #[error("Database error: {0}")]
    DatabaseError(String),
}
