use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::{Form, Json};
use serde::Serialize;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

use super::AppState;
use super::pages::{PageView, render_page};
use crate::crew::CrewEvent;
use crate::planner::PlanForm;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /
///
/// Serves the empty planner form.
pub async fn index() -> Html<String> {
    Html(render_page(&PageView::default()))
}

/// POST /plan
///
/// Invalid submissions get the warning back without touching the generator.
/// Valid ones block until the whole crew has finished.
pub async fn submit_plan(State(state): State<AppState>, Form(form): Form<PlanForm>) -> Response {
    let request = match form.validate() {
        Ok(request) => request,
        Err(e) => {
            tracing::info!("Rejected plan submission: {e}");
            let warning = e.to_string();
            let page = render_page(&PageView {
                form: Some(&form),
                warning: Some(&warning),
                ..Default::default()
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    let (tx, rx) = unbounded_channel();
    let result = state.generator.generate(request, Some(tx)).await;
    let steps = completed_steps(rx);

    match result {
        Ok(output) => {
            let page = render_page(&PageView {
                form: Some(&form),
                steps: &steps,
                plan: Some(&output.raw),
                ..Default::default()
            });
            (StatusCode::OK, Html(page)).into_response()
        }
        Err(e) => {
            tracing::error!("Plan generation failed: {e}");
            let message = e.to_string();
            let page = render_page(&PageView {
                form: Some(&form),
                steps: &steps,
                error: Some(&message),
                ..Default::default()
            });
            (StatusCode::BAD_GATEWAY, Html(page)).into_response()
        }
    }
}

/// Drain progress events once the run is over and keep the labels of tasks
/// that finished.
fn completed_steps(mut rx: UnboundedReceiver<CrewEvent>) -> Vec<String> {
    let mut steps = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let CrewEvent::TaskCompleted { name, .. } = event {
            steps.push(name);
        }
    }
    steps
}
