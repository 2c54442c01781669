use std::sync::Arc;

use axum::{routing::get, Router};

use admin_cell::admin_routes;
use appointment_cell::handlers::AppointmentCellState;
use appointment_cell::router::appointment_routes;
use catalog_cell::catalog_routes;
use notification_cell::Notify;
use settings_cell::settings_routes;
use shared_database::PostgrestClient;

pub fn create_router(db: Arc<PostgrestClient>, notifier: Arc<dyn Notify>) -> Router {
    let appointment_state = AppointmentCellState {
        db: db.clone(),
        notifier,
    };

    let api = Router::new()
        .merge(appointment_routes(appointment_state))
        .merge(catalog_routes(db.clone()))
        .merge(settings_routes(db.clone()))
        .merge(admin_routes(db));

    Router::new()
        .route("/", get(|| async { "Clinic API is running!" }))
        .nest("/api", api)
}
