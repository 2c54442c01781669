use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use admin_cell::admin_routes;
use shared_config::AppConfig;
use shared_database::PostgrestClient;

fn create_test_app(mock_server: &MockServer) -> Router {
    let config = AppConfig {
        postgrest_url: mock_server.uri(),
        postgrest_api_key: "test-key".to_string(),
        ..Default::default()
    };
    admin_routes(Arc::new(PostgrestClient::new(&config)))
}

fn appointment_row(id: i64, service: &str, status: &str, date: &str) -> Value {
    json!({
        "id": id,
        "name": "Jan Kowalski",
        "email": "jan@example.com",
        "phone": null,
        "service": service,
        "service_id": null,
        "appointment_date": date,
        "message": null,
        "status": status,
        "created_at": "2025-01-01T08:00:00",
    })
}

fn service_row(id: i64, name: &str, price: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "price": price,
        "duration_minutes": 45,
        "is_active": is_active,
        "category_id": 1,
        "created_at": "2025-01-01T08:00:00",
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
async fn test_summary_aggregates_counts_and_revenue() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(1, "Pedicure leczniczy", "confirmed", "2099-03-14T10:00:00"),
            appointment_row(2, "pedicure leczniczy", "confirmed", "2099-03-15T11:00:00"),
            appointment_row(3, "Konsultacja", "pending", "2099-03-16T12:00:00"),
            appointment_row(4, "Konsultacja", "cancelled", "2099-03-17T12:00:00"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            service_row(1, "Pedicure leczniczy", "120.50", true),
            service_row(2, "Konsultacja", "50.00", false),
        ])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/admin/summary")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["appointments"]["total"], 4);
    assert_eq!(body["appointments"]["pending"], 1);
    assert_eq!(body["appointments"]["confirmed"], 2);
    assert_eq!(body["appointments"]["cancelled"], 1);
    assert_eq!(body["services"]["total"], 2);
    assert_eq!(body["services"]["active"], 1);
    assert_eq!(body["services"]["average_price"], "85.25");
    // Both confirmed bookings match the catalog name regardless of casing.
    assert_eq!(body["potential_revenue"], "241.00");
}

#[tokio::test]
async fn test_health_check_reports_counts() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(1, "Konsultacja", "pending", "2099-03-16T12:00:00"),
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/service_categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": "Zabiegi",
            "description": null,
            "created_at": "2025-01-01T08:00:00",
            "updated_at": "2025-01-01T08:00:00",
        }])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/admin/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["counts"]["appointments"], 1);
    assert_eq!(body["counts"]["categories"], 1);
    assert_eq!(body["counts"]["services"], 0);
}

#[tokio::test]
async fn test_health_check_propagates_store_failure() {
    let mock_server = MockServer::start().await;
    let app = create_test_app(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "down" })))
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .method("GET")
        .uri("/admin/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
