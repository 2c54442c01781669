use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use notification_cell::{
    spawn_dispatcher, AppointmentCreated, MailTransport, NotificationError, Notify, OutgoingMail,
    RelayMailer,
};
use shared_config::AppConfig;
use shared_database::PostgrestClient;

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<OutgoingMail>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

fn event() -> AppointmentCreated {
    AppointmentCreated {
        name: "Jan Kowalski".to_string(),
        email: "jan@example.com".to_string(),
        phone: None,
        service: "Pedicure leczniczy".to_string(),
        appointment_date: NaiveDate::from_ymd_opt(2099, 3, 14)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap(),
        message: None,
    }
}

fn setting(key: &str, value: &str) -> serde_json::Value {
    json!([{
        "id": 1,
        "key": key,
        "value": value,
        "description": null,
        "updated_at": "2025-01-01T08:00:00",
    }])
}

async fn mock_settings(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.mail_username"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting("mail_username", "mail@clinic.pl")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.mail_password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(setting("mail_password", "sekret")))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.notification_email"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(setting("notification_email", "gabinet@clinic.pl")),
        )
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.clinic_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;
}

fn test_db(server: &MockServer) -> Arc<PostgrestClient> {
    let config = AppConfig {
        postgrest_url: server.uri(),
        postgrest_api_key: "test-key".to_string(),
        ..Default::default()
    };
    Arc::new(PostgrestClient::new(&config))
}

#[tokio::test]
async fn test_dispatcher_delivers_with_settings_credentials() {
    let mock_server = MockServer::start().await;
    mock_settings(&mock_server).await;

    let transport = Arc::new(RecordingTransport::default());
    let handle = spawn_dispatcher(test_db(&mock_server), transport.clone(), Duration::from_secs(5));

    handle.notify(event());

    // Delivery is asynchronous; poll until the worker has processed it.
    let mut delivered = false;
    for _ in 0..50 {
        if !transport.sent.lock().unwrap().is_empty() {
            delivered = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(delivered, "notification was never delivered");

    let sent = transport.sent.lock().unwrap();
    let mail = &sent[0];
    assert_eq!(mail.to, "gabinet@clinic.pl");
    assert_eq!(mail.username, "mail@clinic.pl");
    assert_eq!(mail.password, "sekret");
    // Unset clinic name falls back to the default.
    assert!(mail.subject.contains("Gabinet Podologiczny"));
    assert!(mail.body.contains("Pedicure leczniczy"));
}

#[tokio::test]
async fn test_relay_mailer_posts_to_relay() {
    let relay = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "sent" })))
        .mount(&relay)
        .await;

    let mailer = RelayMailer::new(&format!("{}/send", relay.uri()));
    let mail = OutgoingMail {
        from: "mail@clinic.pl".to_string(),
        to: "gabinet@clinic.pl".to_string(),
        subject: "Nowa rezerwacja".to_string(),
        body: "Szczegóły".to_string(),
        username: "mail@clinic.pl".to_string(),
        password: "sekret".to_string(),
    };

    assert!(mailer.send(&mail).await.is_ok());
}

#[tokio::test]
async fn test_relay_mailer_surfaces_rejection() {
    let relay = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/send"))
        .respond_with(ResponseTemplate::new(502).set_body_json(json!({ "error": "relay down" })))
        .mount(&relay)
        .await;

    let mailer = RelayMailer::new(&format!("{}/send", relay.uri()));
    let mail = OutgoingMail {
        from: "mail@clinic.pl".to_string(),
        to: "gabinet@clinic.pl".to_string(),
        subject: "Nowa rezerwacja".to_string(),
        body: "Szczegóły".to_string(),
        username: "mail@clinic.pl".to_string(),
        password: "sekret".to_string(),
    };

    match mailer.send(&mail).await {
        Err(NotificationError::Rejected(detail)) => assert_eq!(detail, "relay down"),
        other => panic!("expected rejection, got {:?}", other.err()),
    }
}

#[tokio::test]
async fn test_missing_credentials_do_not_reach_transport() {
    let mock_server = MockServer::start().await;

    // No settings at all: every lookup returns empty.
    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let transport = Arc::new(RecordingTransport::default());
    let handle = spawn_dispatcher(test_db(&mock_server), transport.clone(), Duration::from_secs(5));

    handle.notify(event());
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(transport.sent.lock().unwrap().is_empty());
}
