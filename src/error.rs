use std::path::PathBuf;

/// Errors related to configuration loading and parsing.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config at {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Missing credential: set {var} in the environment or in .env")]
    MissingCredential { var: String },

    #[error("Invalid bind address '{addr}': {message}")]
    InvalidBind { addr: String, message: String },
}

/// Errors raised while validating a plan submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please provide both the single/album name and desired style.")]
    MissingFields,
}

/// Errors raised when assembling a crew from agents and tasks.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrewError {
    #[error("Crew has no tasks")]
    NoTasks,

    #[error("Task {task} is assigned to unknown agent {agent}")]
    UnknownAgent { task: usize, agent: usize },

    #[error("Task {task} depends on task {dependency}, which does not run before it")]
    InvalidContext { task: usize, dependency: usize },
}

/// Errors related to running tasks against the LLM.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Model returned an empty answer for task '{task}'")]
    EmptyResponse { task: String },

    #[error("Task '{task}' failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: Box<AgentError>,
    },

    #[error("Run logging error: {0}")]
    LoggingError(String),
}
