//! Sequential crew: runs tasks in declaration order, feeding each task the
//! outputs of the tasks it names as context.

use tokio::sync::mpsc::UnboundedSender;

use super::types::{
    AgentSpec, CrewEvent, CrewOutput, TaskAssignment, TaskExecutor, TaskOutput, TaskSpec,
};
use crate::error::{AgentError, CrewError};

/// A validated set of agents and an ordered task list.
#[derive(Clone, Debug)]
pub struct Crew {
    agents: Vec<AgentSpec>,
    tasks: Vec<TaskSpec>,
}

impl Crew {
    /// Assemble a crew. Every task must reference an existing agent, and
    /// context may only point at tasks that run earlier.
    pub fn new(agents: Vec<AgentSpec>, tasks: Vec<TaskSpec>) -> Result<Self, CrewError> {
        if tasks.is_empty() {
            return Err(CrewError::NoTasks);
        }

        for (i, task) in tasks.iter().enumerate() {
            if task.agent >= agents.len() {
                return Err(CrewError::UnknownAgent {
                    task: i,
                    agent: task.agent,
                });
            }
            if let Some(&dependency) = task.context.iter().find(|&&dep| dep >= i) {
                return Err(CrewError::InvalidContext { task: i, dependency });
            }
        }

        Ok(Self { agents, tasks })
    }

    pub fn agents(&self) -> &[AgentSpec] {
        &self.agents
    }

    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Run every task to completion, in order.
    ///
    /// Stops at the first failing task; no partial output is returned.
    pub async fn kickoff(
        &self,
        executor: &dyn TaskExecutor,
        events: Option<UnboundedSender<CrewEvent>>,
    ) -> Result<CrewOutput, AgentError> {
        let mut outputs: Vec<TaskOutput> = Vec::with_capacity(self.tasks.len());

        for (index, task) in self.tasks.iter().enumerate() {
            let agent = &self.agents[task.agent];
            tracing::info!(task = index, name = %task.name, role = %agent.role, "Task started");

            let assignment = TaskAssignment {
                index,
                agent,
                task,
                context: task.context.iter().map(|&dep| &outputs[dep]).collect(),
                events: events.as_ref(),
            };
            assignment.emit(CrewEvent::TaskStarted {
                task: index,
                name: task.name.clone(),
                agent_role: agent.role.clone(),
            });

            let raw = executor
                .execute(assignment)
                .await
                .map_err(|e| AgentError::TaskFailed {
                    task: task.name.clone(),
                    source: Box::new(e),
                })?;

            tracing::info!(task = index, chars = raw.len(), "Task completed");
            if let Some(tx) = events.as_ref() {
                let _ = tx.send(CrewEvent::TaskCompleted {
                    task: index,
                    name: task.name.clone(),
                    agent_role: agent.role.clone(),
                });
            }

            outputs.push(TaskOutput {
                task: index,
                name: task.name.clone(),
                agent_role: agent.role.clone(),
                raw,
            });
        }

        let raw = outputs
            .last()
            .map(|o| o.raw.clone())
            .unwrap_or_default();

        Ok(CrewOutput {
            raw,
            tasks_output: outputs,
        })
    }
}
