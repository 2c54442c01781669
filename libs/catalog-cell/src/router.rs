// libs/catalog-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_database::PostgrestClient;

use crate::handlers;

pub fn catalog_routes(db: Arc<PostgrestClient>) -> Router {
    Router::new()
        .route(
            "/service-categories",
            get(handlers::list_categories).post(handlers::create_category),
        )
        .route(
            "/service-categories/{category_id}",
            get(handlers::get_category)
                .put(handlers::update_category)
                .delete(handlers::delete_category),
        )
        .route(
            "/services",
            get(handlers::list_services).post(handlers::create_service),
        )
        .route(
            "/services/{service_id}",
            get(handlers::get_service)
                .put(handlers::update_service)
                .delete(handlers::delete_service),
        )
        .with_state(db)
}
