// libs/admin-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::PostgrestClient;

use crate::handlers;

pub fn admin_routes(db: Arc<PostgrestClient>) -> Router {
    Router::new()
        .route("/admin/summary", get(handlers::get_admin_summary))
        .route("/admin/health", get(handlers::health_check))
        .with_state(db)
}
