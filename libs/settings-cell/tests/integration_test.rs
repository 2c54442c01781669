use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use settings_cell::router::settings_routes;
use shared_config::AppConfig;
use shared_database::PostgrestClient;

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = AppConfig {
        postgrest_url: mock_server.uri(),
        postgrest_api_key: "test-key".to_string(),
        ..Default::default()
    };
    settings_routes(Arc::new(PostgrestClient::new(&config)))
}

fn setting_row(id: i64, key: &str, value: &str) -> Value {
    json!({
        "id": id,
        "key": key,
        "value": value,
        "description": null,
        "updated_at": "2025-01-01T08:00:00",
    })
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upsert_setting_creates_when_absent() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/settings"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([setting_row(1, "clinic_name", "Gabinet")])),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/settings")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "key": "clinic_name", "value": "Gabinet" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["setting"]["value"], "Gabinet");
}

#[tokio::test]
async fn test_upsert_setting_updates_existing_key_case_insensitively() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    // Stored as "Clinic_Name"; the upsert uses lowercase and still matches.
    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.clinic_name"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(5, "Clinic_Name", "Stara nazwa")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/settings"))
        .and(query_param("id", "eq.5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(5, "Clinic_Name", "Nowa nazwa")])),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/settings")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "key": "clinic_name", "value": "Nowa nazwa" }).to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["setting"]["value"], "Nowa nazwa");
}

#[tokio::test]
async fn test_upsert_setting_requires_a_key() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    let request = Request::builder()
        .method("POST")
        .uri("/settings")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "value": "bez klucza" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_setting_not_found() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/settings/nonexistent")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_bulk_update_upserts_every_key() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.mail_username"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.notification_email"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(2, "notification_email", "old@example.com")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/settings"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!([setting_row(1, "mail_username", "mail@example.com")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/settings"))
        .and(query_param("id", "eq.2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(2, "notification_email", "new@example.com")])),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("POST")
        .uri("/settings/bulk")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({
                "settings": [
                    { "key": "mail_username", "value": "mail@example.com" },
                    { "key": "notification_email", "value": "new@example.com" },
                    { "key": "   ", "value": "ignored" },
                ],
            })
            .to_string(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    // The blank-key entry is skipped, not an error.
    assert_eq!(body["updated"], 2);
    assert_eq!(body["settings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_delete_setting() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/settings"))
        .and(query_param("key", "ilike.clinic_name"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(3, "clinic_name", "Gabinet")])),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/settings"))
        .and(query_param("id", "eq.3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([setting_row(3, "clinic_name", "Gabinet")])),
        )
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/settings/clinic_name")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
