//! Single-page web UI.
//!
//! `GET /` serves the empty form, `POST /plan` validates the submission and
//! runs plan generation inside the request, `GET /health` reports liveness.

pub mod handlers;
pub mod pages;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::trace::TraceLayer;

use crate::planner::PlanGenerator;

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn PlanGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn PlanGenerator>) -> Self {
        Self { generator }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/plan", get(handlers::index).post(handlers::submit_plan))
        .route("/health", get(handlers::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
