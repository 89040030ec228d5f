//! Multi-agent crew orchestration.
//!
//! A [`Crew`] pairs role-labelled [`AgentSpec`]s with an ordered list of
//! [`TaskSpec`]s and runs them one after another through a [`TaskExecutor`].
//! Task dependencies are expressed as context indices that must point at
//! earlier tasks.

pub mod prompt;
pub mod sequential;
pub mod types;

pub use sequential::Crew;
pub use types::{
    AgentSpec, CrewEvent, CrewOutput, TaskAssignment, TaskExecutor, TaskOutput, TaskSpec,
};
