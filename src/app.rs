use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/energy", get(handlers::get_energy))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/refresh", post(handlers::refresh))
        .route("/api/entries", post(handlers::create_entry))
        .route("/api/config", get(handlers::get_config))
        .with_state(state)
}
