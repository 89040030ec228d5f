//! Prompt construction for agents and tasks.
//!
//! The agent prompt becomes the system message and describes who the model
//! is playing. The task prompt becomes the first user message and carries the
//! description, the expected output, and the outputs of context tasks.

use super::types::{AgentSpec, TaskOutput, TaskSpec};

/// Build the system prompt for an agent.
pub fn build_agent_prompt(agent: &AgentSpec) -> String {
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(&format!("You are {}. {}\n", agent.role, agent.backstory));
    prompt.push_str(&format!("Your personal goal is: {}\n\n", agent.goal));

    if agent.tools.is_empty() {
        prompt.push_str("You have no tools. Answer from your own expertise.\n");
    } else {
        prompt.push_str("## Available Tools\n\n");
        for tool in &agent.tools {
            prompt.push_str(&format!("- **{}**: {}\n", tool.name(), tool.description()));
        }
        prompt.push_str(
            "\nUse the tools when current information would improve your answer. \
             Tool results are JSON.\n",
        );
    }

    if !agent.allow_delegation {
        prompt.push_str("You work alone: do not ask other team members to do your task.\n");
    }

    prompt.push_str(
        "\nWhen you are done, reply with your complete final answer only, \
         formatted as markdown.\n",
    );

    prompt
}

/// Build the user prompt for a task, including context task outputs.
pub fn build_task_prompt(task: &TaskSpec, context: &[&TaskOutput]) -> String {
    let mut prompt = String::with_capacity(2048);

    prompt.push_str("## Current Task\n\n");
    prompt.push_str(&task.description);
    prompt.push_str("\n\n");

    prompt.push_str("## Expected Output\n\n");
    prompt.push_str(&task.expected_output);
    prompt.push_str("\n\n");

    if !context.is_empty() {
        prompt.push_str("## Context\n\n");
        prompt.push_str("This is the work of your teammates on earlier tasks:\n\n");
        for output in context {
            prompt.push_str(&format!(
                "### {} ({})\n\n{}\n\n",
                output.name, output.agent_role, output.raw
            ));
        }
    }

    prompt.push_str("Begin! This is very important to you, do your best work.");
    prompt
}
