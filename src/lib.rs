use std::sync::Arc;

use axum::{
    middleware,
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod auth;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod serializers;

pub use config::Config;
pub use db::{InventoryStore, MemoryStore, PgStore};
pub use error::{AppError, AppResult};

/// Shared application state — cheap to clone (the store sits behind an Arc).
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InventoryStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn InventoryStore>) -> Self {
        Self { store }
    }
}

pub fn build_router(state: AppState) -> Router {
    use handlers::{items, suppliers};

    let api = Router::new()
        // ── Items ───────────────────────────────────────────────────────────
        .route(
            "/api/items/",
            get(items::list_items).post(items::create_item),
        )
        .route(
            "/api/items/:id/",
            get(items::get_item)
                .put(items::update_item)
                .patch(items::partial_update_item)
                .delete(items::delete_item),
        )
        .route(
            "/api/items/:id/suppliers/",
            get(items::list_item_suppliers),
        )

        // ── Suppliers ───────────────────────────────────────────────────────
        .route(
            "/api/suppliers/",
            get(suppliers::list_suppliers).post(suppliers::create_supplier),
        )
        .route(
            "/api/suppliers/:id/",
            get(suppliers::get_supplier)
                .put(suppliers::update_supplier)
                .patch(suppliers::partial_update_supplier)
                .delete(suppliers::delete_supplier),
        )
        .route(
            "/api/suppliers/:id/items/",
            get(suppliers::list_supplier_items),
        )
        .fallback(handlers::not_found)

        // ── Auth gate (covers the fallback and 405s too) ────────────────────
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_token,
        ));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
