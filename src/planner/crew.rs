//! The marketing crew: four agents and four tasks built from a request.

use super::request::PlanRequest;
use crate::crew::{AgentSpec, Crew, TaskSpec};
use crate::tools::ToolKind;

pub const STRATEGIST: usize = 0;
pub const CREATOR: usize = 1;
pub const SCHEDULER: usize = 2;
pub const REVIEWER: usize = 3;

pub const STRATEGY_TASK: usize = 0;
pub const CONTENT_TASK: usize = 1;
pub const SCHEDULE_TASK: usize = 2;
pub const REVIEW_TASK: usize = 3;

pub fn agents() -> Vec<AgentSpec> {
    vec![
        AgentSpec::new(
            "Music Marketing Strategist",
            "Create an actionable marketing strategy using current trends",
            "Expert music marketer who uses real-time insights to create relevant marketing strategies.",
        )
        .with_tool(ToolKind::WebSearch),
        AgentSpec::new(
            "Content Creator",
            "Develop engaging promotional content leveraging YouTube channel insights",
            "Creative professional crafting impactful promotional content by analyzing YouTube trends.",
        )
        .with_tool(ToolKind::YoutubeChannelSearch),
        AgentSpec::new(
            "Social Scheduler",
            "Suggest ideal timing for social media content",
            "Analytics-driven expert optimizing posting schedules.",
        ),
        AgentSpec::new(
            "Reviewer",
            "Ensure content quality and brand alignment",
            "Experienced editor ensuring content quality and consistency.",
        ),
    ]
}

pub fn strategy_description(request: &PlanRequest) -> String {
    format!(
        "Create a concise marketing strategy for '{}' with style '{}'. \
         Use current trends in the music industry, popular hashtags, and competitor insights. \
         Include target audience, recommended platforms, and promotional angles.",
        request.single_name, request.style_tone
    )
}

/// The content brief. Names the channel only when one was given.
pub fn content_description(youtube_channel: Option<&str>) -> String {
    match youtube_channel {
        Some(channel) => format!(
            "Generate engaging content ideas for Instagram posts, TikTok videos, and promotional emails. \
             Analyze the YouTube channel '{channel}' to leverage successful promotional strategies and video trends."
        ),
        None => "Generate engaging content ideas for Instagram posts, TikTok videos, and promotional emails. \
                 Use general trending video insights in the music industry."
            .to_string(),
    }
}

pub fn tasks(request: &PlanRequest) -> Vec<TaskSpec> {
    vec![
        TaskSpec::new(
            "Creating Marketing Strategy...",
            strategy_description(request),
            "Brief, actionable marketing plan based on real-time insights.",
            STRATEGIST,
        ),
        TaskSpec::new(
            "Generating Content Ideas...",
            content_description(request.youtube_channel.as_deref()),
            "Clear, relevant, and engaging content ideas based on provided YouTube insights.",
            CREATOR,
        )
        .with_context(&[STRATEGY_TASK]),
        TaskSpec::new(
            "Determining Optimal Posting Schedule...",
            "Provide optimal posting schedule recommendations for social media. \
             Always output the schedule in a table",
            "Suggested posting schedule (days and times). Always output the schedule into a table.",
            SCHEDULER,
        )
        .with_context(&[CONTENT_TASK]),
        TaskSpec::new(
            "Reviewing and Refining Output...",
            "Review and refine all content for quality and alignment.",
            "Polished final marketing strategy, content, and schedule.",
            REVIEWER,
        )
        .with_context(&[STRATEGY_TASK, CONTENT_TASK, SCHEDULE_TASK]),
    ]
}

/// Build the marketing crew for a validated request.
pub fn build_crew(request: &PlanRequest) -> Crew {
    match Crew::new(agents(), tasks(request)) {
        Ok(crew) => crew,
        // The agent and task tables above are fixed; a failure here is a
        // programming error, not an input error.
        Err(e) => unreachable!("marketing crew is statically valid: {e}"),
    }
}
