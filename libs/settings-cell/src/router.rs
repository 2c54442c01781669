// libs/settings-cell/src/router.rs
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_database::PostgrestClient;

use crate::handlers;

pub fn settings_routes(db: Arc<PostgrestClient>) -> Router {
    Router::new()
        .route(
            "/settings",
            get(handlers::list_settings).post(handlers::upsert_setting),
        )
        .route("/settings/bulk", post(handlers::bulk_update_settings))
        .route(
            "/settings/{key}",
            get(handlers::get_setting).delete(handlers::delete_setting),
        )
        .with_state(db)
}
