// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::{debug, info, warn};

use catalog_cell::repository::CatalogRepository;
use notification_cell::{AppointmentCreated, Notify};
use shared_database::PostgrestClient;

use crate::models::{
    Appointment, AppointmentError, AppointmentStatus, CreateAppointmentRequest, NewAppointment,
    UpdateAppointmentRequest,
};
use crate::repository::AppointmentRepository;

/// Time of day assumed when a booking request carries a date but no time.
fn default_appointment_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).expect("09:00 is valid")
}

/// The appointment lifecycle manager: validates and creates bookings,
/// applies status changes, and hands created appointments to the notifier
/// without letting delivery affect the outcome.
pub struct BookingService {
    repo: AppointmentRepository,
    catalog: CatalogRepository,
    notifier: Arc<dyn Notify>,
}

impl BookingService {
    pub fn new(db: Arc<PostgrestClient>, notifier: Arc<dyn Notify>) -> Self {
        Self {
            repo: AppointmentRepository::new(Arc::clone(&db)),
            catalog: CatalogRepository::new(db),
            notifier,
        }
    }

    pub fn repository(&self) -> &AppointmentRepository {
        &self.repo
    }

    /// Validate and persist a booking request. The insert runs through the
    /// store's transactional slot check, so a lost race on the same hour
    /// surfaces as `SlotTaken` rather than a double booking.
    pub async fn create(
        &self,
        request: CreateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let fields = NormalizedFields::from_request(&request);
        fields.require_all()?;

        let appointment_date = fields.resolve_instant()?;

        if appointment_date < Local::now().naive_local() {
            return Err(AppointmentError::PastDate);
        }

        // Best-effort catalog resolution: a matching service name yields the
        // foreign key, an unknown name still books with the text snapshot.
        let service_id = match self.catalog.find_service_by_name(&fields.service).await {
            Ok(Some(service)) => Some(service.id),
            Ok(None) => {
                debug!("Service '{}' not found in catalog, storing name only", fields.service);
                None
            }
            Err(e) => {
                warn!("Catalog lookup failed during booking, storing name only: {}", e);
                None
            }
        };

        let appointment = self
            .repo
            .book(NewAppointment {
                name: fields.name.clone(),
                email: fields.email.clone(),
                phone: fields.phone.clone(),
                service: fields.service.clone(),
                service_id,
                appointment_date,
                message: fields.message.clone(),
            })
            .await?;

        info!("Appointment {} created for {}", appointment.id, appointment.appointment_date);

        // Fire-and-forget: the booking is already committed, delivery
        // problems are the dispatcher's to log.
        self.notifier.notify(AppointmentCreated {
            name: appointment.name.clone(),
            email: appointment.email.clone(),
            phone: appointment.phone.clone(),
            service: appointment.service.clone(),
            appointment_date: appointment.appointment_date,
            message: appointment.message.clone(),
        });

        Ok(appointment)
    }

    /// Only `status` is mutable through this path; other request fields are
    /// ignored. Any value outside the allowed set leaves the row untouched.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        let status = match request.status.as_deref().map(str::trim) {
            Some(raw) => raw.parse::<AppointmentStatus>()?,
            None => return self.repo.get(id).await,
        };

        let updated = self.repo.update_status(id, status).await?;
        info!("Appointment {} status set to {}", id, status);
        Ok(updated)
    }

    pub async fn list(&self) -> Result<Vec<Appointment>, AppointmentError> {
        self.repo.list_all().await
    }

    pub async fn get(&self, id: i64) -> Result<Appointment, AppointmentError> {
        self.repo.get(id).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppointmentError> {
        self.repo.delete(id).await?;
        info!("Appointment {} deleted", id);
        Ok(())
    }
}

/// Trimmed request fields plus the raw date/time representations, kept
/// separate so every missing field can be reported in one response.
struct NormalizedFields {
    name: String,
    email: String,
    phone: Option<String>,
    service: String,
    date: String,
    time: String,
    datetime: String,
    message: Option<String>,
}

impl NormalizedFields {
    fn from_request(request: &CreateAppointmentRequest) -> Self {
        Self {
            name: trimmed(&request.name),
            email: trimmed(&request.email),
            phone: non_blank(&request.phone),
            service: trimmed(&request.service),
            date: trimmed(&request.date),
            time: trimmed(&request.time),
            datetime: trimmed(&request.datetime),
            message: non_blank(&request.message),
        }
    }

    fn require_all(&self) -> Result<(), AppointmentError> {
        let mut missing = Vec::new();
        if self.name.is_empty() {
            missing.push("name".to_string());
        }
        if self.email.is_empty() {
            missing.push("email".to_string());
        }
        if self.service.is_empty() {
            missing.push("service".to_string());
        }
        // A combined datetime stands in for the separate date field.
        if self.date.is_empty() && self.datetime.is_empty() {
            missing.push("date".to_string());
        }

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppointmentError::MissingFields(missing))
        }
    }

    /// A full `datetime` takes precedence; otherwise `date` + `time`
    /// (defaulting to 09:00) combine into the appointment instant.
    fn resolve_instant(&self) -> Result<NaiveDateTime, AppointmentError> {
        if !self.datetime.is_empty() {
            return parse_datetime(&self.datetime);
        }

        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").map_err(|_| {
            AppointmentError::InvalidFormat("Invalid date format. Use YYYY-MM-DD".to_string())
        })?;

        let time = if self.time.is_empty() {
            default_appointment_time()
        } else {
            NaiveTime::parse_from_str(&self.time, "%H:%M").map_err(|_| {
                AppointmentError::InvalidFormat("Invalid time format. Use HH:MM".to_string())
            })?
        };

        Ok(date.and_time(time))
    }
}

fn parse_datetime(raw: &str) -> Result<NaiveDateTime, AppointmentError> {
    raw.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| AppointmentError::InvalidFormat("Invalid datetime format".to_string()))
}

fn trimmed(field: &Option<String>) -> String {
    field.as_deref().unwrap_or("").trim().to_string()
}

fn non_blank(field: &Option<String>) -> Option<String> {
    let value = trimmed(field);
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAppointmentRequest {
        CreateAppointmentRequest {
            name: Some("Anna Nowak".to_string()),
            email: Some("anna@example.com".to_string()),
            phone: Some("  ".to_string()),
            service: Some("Konsultacja podologiczna".to_string()),
            date: Some("2099-06-15".to_string()),
            time: None,
            datetime: None,
            message: None,
        }
    }

    #[test]
    fn all_missing_fields_are_reported_at_once() {
        let fields = NormalizedFields::from_request(&CreateAppointmentRequest {
            name: Some("   ".to_string()),
            ..Default::default()
        });
        let err = fields.require_all().unwrap_err();
        match err {
            AppointmentError::MissingFields(missing) => {
                assert_eq!(missing, vec!["name", "email", "service", "date"]);
            }
            other => panic!("expected MissingFields, got {:?}", other),
        }
    }

    #[test]
    fn datetime_satisfies_the_date_requirement() {
        let fields = NormalizedFields::from_request(&CreateAppointmentRequest {
            name: Some("Anna".to_string()),
            email: Some("anna@example.com".to_string()),
            service: Some("Konsultacja".to_string()),
            datetime: Some("2099-01-01T10:00:00".to_string()),
            ..Default::default()
        });
        assert!(fields.require_all().is_ok());
    }

    #[test]
    fn blank_phone_normalizes_to_none() {
        let fields = NormalizedFields::from_request(&full_request());
        assert_eq!(fields.phone, None);
    }

    #[test]
    fn missing_time_defaults_to_nine() {
        let fields = NormalizedFields::from_request(&full_request());
        let instant = fields.resolve_instant().unwrap();
        assert_eq!(instant, "2099-06-15T09:00:00".parse::<NaiveDateTime>().unwrap());
    }

    #[test]
    fn datetime_takes_precedence_over_date_and_time() {
        let mut request = full_request();
        request.time = Some("12:00".to_string());
        request.datetime = Some("2099-01-01T10:00:00".to_string());
        let fields = NormalizedFields::from_request(&request);
        let instant = fields.resolve_instant().unwrap();
        assert_eq!(instant, "2099-01-01T10:00:00".parse::<NaiveDateTime>().unwrap());
    }

    #[test]
    fn datetime_without_seconds_parses() {
        assert!(parse_datetime("2099-01-01T10:00").is_ok());
    }

    #[test]
    fn malformed_date_is_invalid_format() {
        let mut request = full_request();
        request.date = Some("15-06-2099".to_string());
        let fields = NormalizedFields::from_request(&request);
        assert!(matches!(
            fields.resolve_instant(),
            Err(AppointmentError::InvalidFormat(_))
        ));
    }

    #[test]
    fn malformed_time_is_invalid_format() {
        let mut request = full_request();
        request.time = Some("9 rano".to_string());
        let fields = NormalizedFields::from_request(&request);
        assert!(matches!(
            fields.resolve_instant(),
            Err(AppointmentError::InvalidFormat(_))
        ));
    }
}
