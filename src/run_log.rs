//! JSONL run logger for replaying plan generations.
//!
//! Each plan run produces one file named `run-{timestamp}-{id}.jsonl` in the
//! configured run log directory. Every line is a self-describing event tagged
//! with `event_type`.
//!
//! Uses synchronous `std::fs` since writes are small, buffered, and flushed
//! after each event.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;

use crate::planner::PlanRequest;

/// Returns the current UTC time as an ISO 8601 string with milliseconds.
fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// A structured log entry serialized as a single JSON line.
#[derive(Debug, Serialize)]
#[serde(tag = "event_type")]
pub enum LogEntry {
    #[serde(rename = "run_start")]
    RunStart {
        timestamp: String,
        run_id: String,
        model: String,
        single_name: String,
        style_tone: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        youtube_channel: Option<String>,
    },

    #[serde(rename = "task_start")]
    TaskStart {
        timestamp: String,
        task: usize,
        name: String,
        agent_role: String,
    },

    /// Text the model produced alongside tool calls.
    #[serde(rename = "assistant_text")]
    AssistantText {
        timestamp: String,
        task: usize,
        iteration: usize,
        content: String,
    },

    #[serde(rename = "tool_call")]
    ToolCall {
        timestamp: String,
        task: usize,
        call_id: String,
        fn_name: String,
        fn_arguments: serde_json::Value,
    },

    #[serde(rename = "tool_result")]
    ToolResult {
        timestamp: String,
        task: usize,
        call_id: String,
        fn_name: String,
        result: String,
    },

    #[serde(rename = "task_output")]
    TaskOutput {
        timestamp: String,
        task: usize,
        iterations: usize,
        output: String,
    },

    #[serde(rename = "error")]
    Error {
        timestamp: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        task: Option<usize>,
        message: String,
    },

    #[serde(rename = "run_end")]
    RunEnd {
        timestamp: String,
        outcome: String,
        elapsed_secs: f64,
    },
}

impl LogEntry {
    pub fn task_start(task: usize, name: &str, agent_role: &str) -> Self {
        LogEntry::TaskStart {
            timestamp: now_iso(),
            task,
            name: name.to_string(),
            agent_role: agent_role.to_string(),
        }
    }

    pub fn assistant_text(task: usize, iteration: usize, content: &str) -> Self {
        LogEntry::AssistantText {
            timestamp: now_iso(),
            task,
            iteration,
            content: content.to_string(),
        }
    }

    pub fn tool_call(task: usize, call: &genai::chat::ToolCall) -> Self {
        LogEntry::ToolCall {
            timestamp: now_iso(),
            task,
            call_id: call.call_id.clone(),
            fn_name: call.fn_name.clone(),
            fn_arguments: call.fn_arguments.clone(),
        }
    }

    pub fn tool_result(task: usize, call: &genai::chat::ToolCall, result: &str) -> Self {
        LogEntry::ToolResult {
            timestamp: now_iso(),
            task,
            call_id: call.call_id.clone(),
            fn_name: call.fn_name.clone(),
            result: result.to_string(),
        }
    }

    pub fn task_output(task: usize, iterations: usize, output: &str) -> Self {
        LogEntry::TaskOutput {
            timestamp: now_iso(),
            task,
            iterations,
            output: output.to_string(),
        }
    }

    pub fn error(task: Option<usize>, message: impl Into<String>) -> Self {
        LogEntry::Error {
            timestamp: now_iso(),
            task,
            message: message.into(),
        }
    }
}

/// Append-only JSONL logger for one plan run.
pub struct RunLogger {
    writer: BufWriter<fs::File>,
    log_path: PathBuf,
    run_id: String,
}

impl RunLogger {
    /// Create a new run log in `log_dir`, creating the directory if needed.
    ///
    /// The file is named `run-{timestamp}-{id8}.jsonl` with colons replaced
    /// by dashes for filesystem safety.
    pub fn new(log_dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(log_dir)?;

        let run_id = uuid::Uuid::new_v4().to_string();
        let stamp = Utc::now().format("%Y-%m-%dT%H-%M-%S");
        let filename = format!("run-{stamp}-{}.jsonl", &run_id[..8]);
        let log_path = log_dir.join(filename);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        Ok(Self {
            writer: BufWriter::new(file),
            log_path,
            run_id,
        })
    }

    /// Serialize a log entry as a single JSON line and flush.
    pub fn log_event(&mut self, event: &LogEntry) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Convenience: log a run_start event for a validated request.
    pub fn log_run_start(&mut self, model: &str, request: &PlanRequest) -> anyhow::Result<()> {
        let entry = LogEntry::RunStart {
            timestamp: now_iso(),
            run_id: self.run_id.clone(),
            model: model.to_string(),
            single_name: request.single_name.clone(),
            style_tone: request.style_tone.clone(),
            youtube_channel: request.youtube_channel.clone(),
        };
        self.log_event(&entry)
    }

    /// Convenience: log a run_end event.
    pub fn log_run_end(&mut self, outcome: &str, elapsed_secs: f64) -> anyhow::Result<()> {
        self.log_event(&LogEntry::RunEnd {
            timestamp: now_iso(),
            outcome: outcome.to_string(),
            elapsed_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::BufRead;
    use tempfile::TempDir;

    fn make_logger() -> (RunLogger, TempDir) {
        let tmp = TempDir::new().expect("tempdir");
        // Nested dir that does not exist yet.
        let logger = RunLogger::new(&tmp.path().join("logs")).expect("RunLogger::new");
        (logger, tmp)
    }

    fn read_lines(logger: &RunLogger) -> Vec<serde_json::Value> {
        let file = fs::File::open(logger.log_path()).expect("open log");
        std::io::BufReader::new(file)
            .lines()
            .map(|l| serde_json::from_str(&l.expect("read line")).expect("valid JSON"))
            .collect()
    }

    fn request(channel: Option<&str>) -> PlanRequest {
        PlanRequest {
            single_name: "Midnight Drive".to_string(),
            style_tone: "moody".to_string(),
            youtube_channel: channel.map(str::to_string),
        }
    }

    #[test]
    fn creates_log_file_in_configured_dir() {
        let (logger, tmp) = make_logger();
        let log_path = logger.log_path().to_owned();

        assert!(log_path.exists(), "log file should exist at {log_path:?}");
        assert!(log_path.starts_with(tmp.path().join("logs")));

        let name = log_path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("run-"));
        assert!(name.ends_with(".jsonl"));
        assert!(name.contains(&logger.run_id()[..8]));
    }

    #[test]
    fn run_start_records_inputs_and_omits_blank_channel() {
        let (mut logger, _tmp) = make_logger();
        logger.log_run_start("gpt-4-turbo", &request(None)).unwrap();

        let lines = read_lines(&logger);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["event_type"], "run_start");
        assert_eq!(lines[0]["model"], "gpt-4-turbo");
        assert_eq!(lines[0]["single_name"], "Midnight Drive");
        assert_eq!(lines[0]["run_id"], logger.run_id());
        assert!(lines[0].get("youtube_channel").is_none());
    }

    #[test]
    fn full_run_produces_one_line_per_event() {
        let (mut logger, _tmp) = make_logger();
        let call = genai::chat::ToolCall {
            call_id: "call_001".to_string(),
            fn_name: "web_search".to_string(),
            fn_arguments: serde_json::json!({"query": "synthwave hashtags"}),
            thought_signatures: None,
        };

        logger.log_run_start("gpt-4-turbo", &request(Some("The Midnight"))).unwrap();
        logger
            .log_event(&LogEntry::task_start(0, "Creating Marketing Strategy...", "Strategist"))
            .unwrap();
        logger.log_event(&LogEntry::tool_call(0, &call)).unwrap();
        logger.log_event(&LogEntry::tool_result(0, &call, "[]")).unwrap();
        logger.log_event(&LogEntry::task_output(0, 2, "# Strategy")).unwrap();
        logger.log_run_end("completed", 1.5).unwrap();

        let lines = read_lines(&logger);
        let kinds: Vec<&str> = lines
            .iter()
            .map(|l| l["event_type"].as_str().unwrap())
            .collect();
        assert_eq!(
            kinds,
            ["run_start", "task_start", "tool_call", "tool_result", "task_output", "run_end"]
        );
        assert_eq!(lines[0]["youtube_channel"], "The Midnight");
        assert_eq!(lines[2]["fn_arguments"]["query"], "synthwave hashtags");
        assert_eq!(lines[5]["outcome"], "completed");
    }

    #[test]
    fn error_without_task_omits_field() {
        let (mut logger, _tmp) = make_logger();
        logger.log_event(&LogEntry::error(None, "quota exceeded")).unwrap();

        let lines = read_lines(&logger);
        assert_eq!(lines[0]["event_type"], "error");
        assert_eq!(lines[0]["message"], "quota exceeded");
        assert!(lines[0].get("task").is_none());
    }
}
