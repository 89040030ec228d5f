use std::sync::Arc;
use std::sync::Mutex;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::future::BoxFuture;
use tokio::sync::mpsc::UnboundedSender;
use tower::util::ServiceExt;

use encore::crew::{CrewEvent, CrewOutput};
use encore::error::AgentError;
use encore::planner::{PlanGenerator, PlanRequest};
use encore::web::{AppState, build_router};

// ─── Helper ───────────────────────────────────────────────────────────

/// Records every request and replies with a canned plan or error.
struct FakeGenerator {
    calls: Mutex<Vec<PlanRequest>>,
    fail: bool,
}

impl FakeGenerator {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail,
        })
    }

    fn calls(&self) -> Vec<PlanRequest> {
        self.calls.lock().unwrap().clone()
    }
}

impl PlanGenerator for FakeGenerator {
    fn generate(
        &self,
        request: PlanRequest,
        events: Option<UnboundedSender<CrewEvent>>,
    ) -> BoxFuture<'_, Result<CrewOutput, AgentError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(request);
            if let Some(tx) = events {
                let _ = tx.send(CrewEvent::TaskCompleted {
                    task: 0,
                    name: "Creating Marketing Strategy...".to_string(),
                    agent_role: "Music Marketing Strategist".to_string(),
                });
            }
            if self.fail {
                return Err(AgentError::LlmError("quota exceeded".to_string()));
            }
            Ok(CrewOutput {
                raw: "## Final Plan\n\n| Day | Time |\n|---|---|\n| Fri | 18:00 |\n".to_string(),
                tasks_output: Vec::new(),
            })
        })
    }
}

fn app(generator: Arc<FakeGenerator>) -> axum::Router {
    build_router(AppState::new(generator))
}

fn post_form(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/plan")
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

const WARNING: &str = "Please provide both the single/album name and desired style.";

// ============================================================
// Page and health
// ============================================================

#[tokio::test]
async fn index_serves_empty_form() {
    let response = app(FakeGenerator::new(false))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Enhanced Music Marketing Planner"));
    assert!(html.contains("name=\"single_name\""));
    assert!(html.contains("name=\"style_tone\""));
    assert!(html.contains("name=\"youtube_channel\""));
    assert!(!html.contains(WARNING));
}

#[tokio::test]
async fn health_reports_ok() {
    let response = app(FakeGenerator::new(false))
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "encore");
}

// ============================================================
// Validation never reaches the generator
// ============================================================

#[tokio::test]
async fn empty_name_shows_warning_without_generating() {
    let generator = FakeGenerator::new(false);
    let response = app(generator.clone())
        .oneshot(post_form("single_name=&style_tone=edgy&youtube_channel="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains(WARNING));
    assert!(html.contains(">edgy</textarea>"), "style should be echoed back");
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn empty_style_shows_warning_without_generating() {
    let generator = FakeGenerator::new(false);
    let response = app(generator.clone())
        .oneshot(post_form("single_name=Golden+Hour&style_tone="))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains(WARNING));
    assert!(generator.calls().is_empty());
}

#[tokio::test]
async fn missing_fields_are_treated_as_empty() {
    let generator = FakeGenerator::new(false);
    let response = app(generator.clone()).oneshot(post_form("")).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(generator.calls().is_empty());
}

// ============================================================
// Successful and failed generation
// ============================================================

#[tokio::test]
async fn valid_submission_renders_plan() {
    let generator = FakeGenerator::new(false);
    let response = app(generator.clone())
        .oneshot(post_form(
            "single_name=Golden+Hour&style_tone=warm%2C+nostalgic&youtube_channel=Kacey+Musgraves",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Marketing plan generated successfully!"));
    assert!(html.contains("Your Marketing Plan:"));
    assert!(html.contains("<h2>Final Plan</h2>"));
    assert!(html.contains("<td>Fri</td>"));
    assert!(html.contains("Creating Marketing Strategy..."));

    let calls = generator.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].single_name, "Golden Hour");
    assert_eq!(calls[0].style_tone, "warm, nostalgic");
    assert_eq!(calls[0].youtube_channel.as_deref(), Some("Kacey Musgraves"));
}

#[tokio::test]
async fn whitespace_style_still_generates() {
    let generator = FakeGenerator::new(false);
    let response = app(generator.clone())
        .oneshot(post_form("single_name=Golden+Hour&style_tone=++"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(generator.calls()[0].style_tone, "  ");
}

#[tokio::test]
async fn blank_channel_is_passed_as_none() {
    let generator = FakeGenerator::new(false);
    app(generator.clone())
        .oneshot(post_form("single_name=Golden+Hour&style_tone=warm&youtube_channel=+++"))
        .await
        .unwrap();

    assert_eq!(generator.calls()[0].youtube_channel, None);
}

#[tokio::test]
async fn generation_failure_returns_bad_gateway_page() {
    let generator = FakeGenerator::new(true);
    let response = app(generator)
        .oneshot(post_form("single_name=Golden+Hour&style_tone=warm"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let html = body_text(response).await;
    assert!(html.contains("quota exceeded"));
    assert!(!html.contains("Marketing plan generated successfully!"));
}
