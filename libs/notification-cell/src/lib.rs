pub mod dispatcher;
pub mod models;
pub mod transport;

pub use dispatcher::{spawn_dispatcher, NoopNotifier, NotifierHandle};
pub use models::{AppointmentCreated, NotificationError, Notify};
pub use transport::{MailTransport, OutgoingMail, RelayMailer};
