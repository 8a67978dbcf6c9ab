use axum::{routing::get, Router};
use std::sync::Arc;

use crate::shared::state::AppState;

pub fn configure_api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(crate::crm::api::configure_crm_api_routes())
        .route("/health", get(health))
}

async fn health() -> &'static str {
    "OK"
}
