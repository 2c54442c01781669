// libs/notification-cell/src/dispatcher.rs
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use settings_cell::SettingsService;
use shared_database::PostgrestClient;

use crate::models::{AppointmentCreated, Notify};
use crate::transport::{MailTransport, OutgoingMail};

const QUEUE_CAPACITY: usize = 64;
const DEFAULT_CLINIC_NAME: &str = "Gabinet Podologiczny";

/// Sender side of the notification queue. `notify` never blocks; when the
/// queue is full the event is dropped with a warning, because booking must
/// not stall on mail.
#[derive(Clone)]
pub struct NotifierHandle {
    tx: mpsc::Sender<AppointmentCreated>,
}

impl Notify for NotifierHandle {
    fn notify(&self, event: AppointmentCreated) {
        if let Err(e) = self.tx.try_send(event) {
            warn!("Notification queue full, dropping event: {}", e);
        }
    }
}

/// Notifier that discards every event. Used when mail is not configured.
pub struct NoopNotifier;

impl Notify for NoopNotifier {
    fn notify(&self, event: AppointmentCreated) {
        debug!("Notification delivery disabled, dropping event for {}", event.email);
    }
}

/// Starts the background delivery worker and returns the handle bookings
/// use to enqueue events.
pub fn spawn_dispatcher(
    db: Arc<PostgrestClient>,
    transport: Arc<dyn MailTransport>,
    send_timeout: Duration,
) -> NotifierHandle {
    let (tx, mut rx) = mpsc::channel::<AppointmentCreated>(QUEUE_CAPACITY);

    tokio::spawn(async move {
        info!("Notification dispatcher started");
        while let Some(event) = rx.recv().await {
            let correlation_id = Uuid::new_v4();
            match deliver(&db, transport.as_ref(), &event, send_timeout).await {
                Ok(()) => {
                    info!("Notification {} delivered for {}", correlation_id, event.email)
                }
                Err(e) => {
                    // Delivery failures are logged and swallowed; the
                    // appointment itself is already booked.
                    error!("Notification {} failed: {}", correlation_id, e);
                }
            }
        }
        info!("Notification dispatcher stopped");
    });

    NotifierHandle { tx }
}

async fn deliver(
    db: &Arc<PostgrestClient>,
    transport: &dyn MailTransport,
    event: &AppointmentCreated,
    send_timeout: Duration,
) -> Result<(), crate::models::NotificationError> {
    let settings = SettingsService::new(db.clone());

    // Credentials and recipients live in runtime settings so the clinic can
    // change them without a redeploy.
    let username = settings.get_value("mail_username", "").await;
    let password = settings.get_value("mail_password", "").await;
    let recipient = settings.get_value("notification_email", "").await;
    let clinic_name = settings.get_value("clinic_name", DEFAULT_CLINIC_NAME).await;

    if username.is_empty() || recipient.is_empty() {
        return Err(crate::models::NotificationError::NotConfigured);
    }

    let mail = OutgoingMail {
        from: username.clone(),
        to: recipient,
        subject: format!("Nowa rezerwacja wizyty - {}", clinic_name),
        body: compose_body(event, &clinic_name),
        username,
        password,
    };

    match tokio::time::timeout(send_timeout, transport.send(&mail)).await {
        Ok(result) => result,
        Err(_) => Err(crate::models::NotificationError::Timeout),
    }
}

fn compose_body(event: &AppointmentCreated, clinic_name: &str) -> String {
    let mut body = format!(
        "Nowa rezerwacja wizyty w {}\n\n\
         Imię i nazwisko: {}\n\
         E-mail: {}\n",
        clinic_name, event.name, event.email,
    );
    if let Some(phone) = &event.phone {
        body.push_str(&format!("Telefon: {}\n", phone));
    }
    body.push_str(&format!(
        "Usługa: {}\nTermin: {}\n",
        event.service,
        event.appointment_date.format("%Y-%m-%d %H:%M"),
    ));
    if let Some(message) = &event.message {
        body.push_str(&format!("\nWiadomość od klienta:\n{}\n", message));
    }
    body
}
