//! Plan generation: turns a validated request into a finished plan.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::future::BoxFuture;
use tokio::sync::mpsc::UnboundedSender;

use super::crew::build_crew;
use super::request::PlanRequest;
use crate::agent::LlmExecutor;
use crate::config::AppConfig;
use crate::crew::{CrewEvent, CrewOutput};
use crate::error::AgentError;
use crate::run_log::{LogEntry, RunLogger};

/// Produces a marketing plan for a request.
///
/// The web layer and the CLI depend on this trait rather than on the LLM
/// directly, so both can be driven by a fake in tests.
pub trait PlanGenerator: Send + Sync {
    fn generate(
        &self,
        request: PlanRequest,
        events: Option<UnboundedSender<CrewEvent>>,
    ) -> BoxFuture<'_, Result<CrewOutput, AgentError>>;
}

/// Live generator: runs the marketing crew against the configured model.
pub struct CrewPlanner {
    config: AppConfig,
}

impl CrewPlanner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    async fn run(
        &self,
        request: PlanRequest,
        events: Option<UnboundedSender<CrewEvent>>,
    ) -> Result<CrewOutput, AgentError> {
        let start = Instant::now();
        let logger = open_run_log(&self.config.run_log_dir, &self.config.model, &request)?;

        tracing::info!(
            run_id = %lock(&logger).run_id(),
            single = %request.single_name,
            channel = request.youtube_channel.as_deref().unwrap_or("-"),
            "Generating marketing plan"
        );

        let executor = LlmExecutor::new(&self.config).with_logger(logger.clone());
        let crew = build_crew(&request);
        let result = crew.kickoff(&executor, events).await;

        let elapsed = start.elapsed().as_secs_f64();
        let mut log = lock(&logger);
        let outcome = match &result {
            Ok(_) => "completed".to_string(),
            Err(e) => {
                let _ = log.log_event(&LogEntry::error(None, e.to_string()));
                "failed".to_string()
            }
        };
        if let Err(e) = log.log_run_end(&outcome, elapsed) {
            tracing::warn!("Failed to write run log: {e:#}");
        }
        tracing::info!(outcome = %outcome, elapsed_secs = elapsed, log = %log.log_path().display(), "Plan run finished");

        result
    }
}

impl PlanGenerator for CrewPlanner {
    fn generate(
        &self,
        request: PlanRequest,
        events: Option<UnboundedSender<CrewEvent>>,
    ) -> BoxFuture<'_, Result<CrewOutput, AgentError>> {
        Box::pin(self.run(request, events))
    }
}

fn open_run_log(
    dir: &Path,
    model: &str,
    request: &PlanRequest,
) -> Result<Arc<Mutex<RunLogger>>, AgentError> {
    let mut logger = RunLogger::new(dir).map_err(|e| AgentError::LoggingError(format!("{e:#}")))?;
    logger
        .log_run_start(model, request)
        .map_err(|e| AgentError::LoggingError(format!("{e:#}")))?;
    Ok(Arc::new(Mutex::new(logger)))
}

fn lock(logger: &Mutex<RunLogger>) -> std::sync::MutexGuard<'_, RunLogger> {
    logger.lock().unwrap_or_else(|e| e.into_inner())
}
