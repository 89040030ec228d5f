//! LLM-backed task executor.
//!
//! Runs one crew task as a short tool-calling conversation:
//!
//! 1. System message: the agent's persona prompt
//! 2. User message: the task prompt with context task outputs
//! 3. Stream the completion and capture text and tool calls
//! 4. Dispatch tool calls, append their responses, and re-prompt
//! 5. A text-only reply is the task's output
//!
//! After `max_iterations` tool rounds the request is sent once more without
//! tools so the model has to answer.

use std::sync::{Arc, Mutex};

use futures::StreamExt;
use futures::future::BoxFuture;
use genai::Client;
use genai::chat::{ChatMessage, ChatOptions, ChatRequest, ChatStreamEvent, ToolCall, ToolResponse};

use crate::config::AppConfig;
use crate::crew::prompt::{build_agent_prompt, build_task_prompt};
use crate::crew::{CrewEvent, TaskAssignment, TaskExecutor};
use crate::error::AgentError;
use crate::run_log::{LogEntry, RunLogger};
use crate::tools::{SearchSettings, define_tools, dispatch_tool_call};

const FINAL_ANSWER_NUDGE: &str = "You have used all of your tool calls. \
    Give your complete final answer now, without calling any tools.";

/// What one streamed completion produced.
#[derive(Debug, Default)]
struct Turn {
    text: Option<String>,
    tool_calls: Vec<ToolCall>,
}

/// What the loop does after a turn.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// The trimmed text is the task's output.
    Answer(String),
    /// The model finished without saying anything.
    Empty,
    DispatchTools,
}

/// Rounds after the first `max_iterations` tool rounds must produce an answer.
fn is_final_round(iteration: usize, max_iterations: usize) -> bool {
    iteration > max_iterations
}

/// The request sent this round. On the final round tools are withdrawn and
/// the model is told to answer.
fn round_request(chat_req: &ChatRequest, final_round: bool) -> ChatRequest {
    if final_round && chat_req.tools.is_some() {
        let mut forced = chat_req.clone();
        forced.tools = None;
        forced.append_message(ChatMessage::user(FINAL_ANSWER_NUDGE))
    } else {
        chat_req.clone()
    }
}

/// Tool calls are honoured until the final round; after that whatever text
/// came back is the answer.
fn next_step(turn: &Turn, final_round: bool) -> Step {
    if !turn.tool_calls.is_empty() && !final_round {
        return Step::DispatchTools;
    }
    let answer = turn.text.as_deref().unwrap_or_default().trim();
    if answer.is_empty() {
        Step::Empty
    } else {
        Step::Answer(answer.to_string())
    }
}

pub struct LlmExecutor {
    client: Client,
    model: String,
    options: ChatOptions,
    max_iterations: usize,
    search: SearchSettings,
    logger: Option<Arc<Mutex<RunLogger>>>,
}

impl LlmExecutor {
    pub fn new(config: &AppConfig) -> Self {
        let options = ChatOptions::default()
            .with_temperature(config.temperature)
            .with_capture_content(true)
            .with_capture_tool_calls(true);

        Self {
            client: Client::default(),
            model: config.model.clone(),
            options,
            max_iterations: config.max_iterations,
            search: SearchSettings::from(config),
            logger: None,
        }
    }

    /// Record every turn of every task in `logger`.
    pub fn with_logger(mut self, logger: Arc<Mutex<RunLogger>>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Write a run log event. Logging failures never fail the task.
    fn log(&self, entry: LogEntry) {
        if let Some(logger) = &self.logger {
            let mut guard = logger.lock().unwrap_or_else(|e| e.into_inner());
            if let Err(e) = guard.log_event(&entry) {
                tracing::warn!("Failed to write run log: {e:#}");
            }
        }
    }

    async fn run_task(&self, assignment: TaskAssignment<'_>) -> Result<String, AgentError> {
        let TaskAssignment {
            index, agent, task, ..
        } = assignment;
        self.log(LogEntry::task_start(index, &task.name, &agent.role));

        let mut chat_req = ChatRequest::from_system(build_agent_prompt(agent))
            .append_message(ChatMessage::user(build_task_prompt(task, &assignment.context)));
        if !agent.tools.is_empty() {
            chat_req = chat_req.with_tools(define_tools(&agent.tools));
        }

        let mut iteration = 0;
        loop {
            iteration += 1;
            let final_round = is_final_round(iteration, self.max_iterations);

            let turn = self
                .stream_turn(round_request(&chat_req, final_round))
                .await
                .inspect_err(|e| {
                    self.log(LogEntry::error(Some(index), e.to_string()));
                })?;

            match next_step(&turn, final_round) {
                Step::Answer(answer) => {
                    self.log(LogEntry::task_output(index, iteration, &answer));
                    return Ok(answer);
                }
                Step::Empty => {
                    self.log(LogEntry::error(Some(index), "empty answer"));
                    return Err(AgentError::EmptyResponse {
                        task: task.name.clone(),
                    });
                }
                Step::DispatchTools => {
                    if let Some(text) = turn.text.as_deref().filter(|t| !t.trim().is_empty()) {
                        self.log(LogEntry::assistant_text(index, iteration, text));
                    }
                    chat_req = self
                        .run_tool_round(&assignment, chat_req, &turn.tool_calls)
                        .await;
                }
            }
        }
    }

    /// Execute one round of tool calls in order, appending the assistant's
    /// calls and then each response to the conversation.
    async fn run_tool_round(
        &self,
        assignment: &TaskAssignment<'_>,
        chat_req: ChatRequest,
        calls: &[ToolCall],
    ) -> ChatRequest {
        let index = assignment.index;
        let mut chat_req = chat_req.append_message(ChatMessage::from(calls.to_vec()));

        for call in calls {
            tracing::info!(task = index, tool = %call.fn_name, "Tool call");
            assignment.emit(CrewEvent::ToolCalled {
                task: index,
                fn_name: call.fn_name.clone(),
            });
            self.log(LogEntry::tool_call(index, call));

            let result = dispatch_tool_call(call, &assignment.agent.tools, &self.search).await;

            self.log(LogEntry::tool_result(index, call, &result));
            chat_req = chat_req.append_message(ToolResponse::new(call.call_id.clone(), result));
        }

        chat_req
    }

    /// Stream one completion and collect the captured text and tool calls.
    async fn stream_turn(&self, request: ChatRequest) -> Result<Turn, AgentError> {
        let stream_res = self
            .client
            .exec_chat_stream(&self.model, request, Some(&self.options))
            .await
            .map_err(|e| AgentError::LlmError(e.to_string()))?;

        let mut stream = stream_res.stream;
        let mut turn = Turn::default();
        let mut ended = false;
        let mut last_error = None;

        while let Some(event) = stream.next().await {
            match event {
                Ok(ChatStreamEvent::End(end)) => {
                    ended = true;
                    if let Some(text) = end.captured_first_text() {
                        turn.text = Some(text.to_string());
                    }
                    if let Some(calls) = end.captured_tool_calls() {
                        turn.tool_calls = calls.into_iter().cloned().collect();
                    }
                }
                Ok(_) => {
                    // Start, Chunk, ReasoningChunk, ToolCallChunk -- captured at End.
                }
                Err(e) => {
                    tracing::warn!("LLM stream error: {e}");
                    last_error = Some(e.to_string());
                }
            }
        }

        if !ended {
            return Err(AgentError::LlmError(
                last_error.unwrap_or_else(|| "stream ended without a response".to_string()),
            ));
        }

        Ok(turn)
    }
}

impl TaskExecutor for LlmExecutor {
    fn execute<'a>(
        &'a self,
        assignment: TaskAssignment<'a>,
    ) -> BoxFuture<'a, Result<String, AgentError>> {
        Box::pin(self.run_task(assignment))
    }
}
