//! The music marketing planner: form validation, the four-agent crew, and
//! plan generation.

pub mod crew;
pub mod generator;
pub mod request;

pub use crew::build_crew;
pub use generator::{CrewPlanner, PlanGenerator};
pub use request::{PlanForm, PlanRequest};
