//! Shared vocabulary of the crew subsystem: agents, tasks, their outputs,
//! progress events, and the executor seam the LLM plugs into.

use futures::future::BoxFuture;
use tokio::sync::mpsc::UnboundedSender;

use crate::error::AgentError;
use crate::tools::ToolKind;

/// A role-labelled LLM persona.
#[derive(Clone, Debug)]
pub struct AgentSpec {
    pub role: String,
    pub goal: String,
    pub backstory: String,
    /// Tools the agent may call while working on a task.
    pub tools: Vec<ToolKind>,
    /// Always false for the planner's agents. Recorded in the prompt so the
    /// model does not try to hand work off.
    pub allow_delegation: bool,
}

impl AgentSpec {
    pub fn new(role: &str, goal: &str, backstory: &str) -> Self {
        Self {
            role: role.to_string(),
            goal: goal.to_string(),
            backstory: backstory.to_string(),
            tools: Vec::new(),
            allow_delegation: false,
        }
    }

    pub fn with_tool(mut self, tool: ToolKind) -> Self {
        self.tools.push(tool);
        self
    }
}

/// A unit of work assigned to one agent.
#[derive(Clone, Debug)]
pub struct TaskSpec {
    /// Short label shown while the task runs.
    pub name: String,
    pub description: String,
    pub expected_output: String,
    /// Index into the crew's agents.
    pub agent: usize,
    /// Indices of earlier tasks whose outputs this task receives.
    pub context: Vec<usize>,
}

impl TaskSpec {
    pub fn new(
        name: &str,
        description: impl Into<String>,
        expected_output: &str,
        agent: usize,
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.into(),
            expected_output: expected_output.to_string(),
            agent,
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: &[usize]) -> Self {
        self.context = context.to_vec();
        self
    }
}

/// The text one task produced.
#[derive(Clone, Debug)]
pub struct TaskOutput {
    pub task: usize,
    pub name: String,
    pub agent_role: String,
    pub raw: String,
}

/// Result of a full crew run. `raw` is the final task's output.
#[derive(Clone, Debug)]
pub struct CrewOutput {
    pub raw: String,
    pub tasks_output: Vec<TaskOutput>,
}

/// Progress notifications emitted while a crew runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CrewEvent {
    TaskStarted {
        task: usize,
        name: String,
        agent_role: String,
    },
    ToolCalled {
        task: usize,
        fn_name: String,
    },
    TaskCompleted {
        task: usize,
        name: String,
        agent_role: String,
    },
}

/// Everything an executor needs to run one task.
pub struct TaskAssignment<'a> {
    pub index: usize,
    pub agent: &'a AgentSpec,
    pub task: &'a TaskSpec,
    /// Outputs of the tasks listed in `task.context`, in that order.
    pub context: Vec<&'a TaskOutput>,
    pub events: Option<&'a UnboundedSender<CrewEvent>>,
}

impl TaskAssignment<'_> {
    /// Send a progress event if anyone is listening. Send errors are ignored
    /// (the receiver may have gone away).
    pub fn emit(&self, event: CrewEvent) {
        if let Some(tx) = self.events {
            let _ = tx.send(event);
        }
    }
}

/// Runs a single task for a single agent and returns its text output.
pub trait TaskExecutor: Send + Sync {
    fn execute<'a>(&'a self, assignment: TaskAssignment<'a>)
    -> BoxFuture<'a, Result<String, AgentError>>;
}
