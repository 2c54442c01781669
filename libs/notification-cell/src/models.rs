// libs/notification-cell/src/models.rs
use chrono::NaiveDateTime;

/// Event raised when a booking succeeds. Carries everything the clinic
/// notification needs so the worker never has to read the appointment back.
#[derive(Debug, Clone)]
pub struct AppointmentCreated {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: String,
    pub appointment_date: NaiveDateTime,
    pub message: Option<String>,
}

/// Capability to emit a notification without waiting for delivery. Callers
/// must never block or fail because of the notification path.
pub trait Notify: Send + Sync {
    fn notify(&self, event: AppointmentCreated);
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("Mail delivery is not configured")]
    NotConfigured,

    #[error("Mail relay rejected the message: {0}")]
    Rejected(String),

    #[error("Mail transport error: {0}")]
    Transport(String),

    #[error("Mail delivery timed out")]
    Timeout,
}
