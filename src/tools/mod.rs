//! Tool schema definitions and dispatch for the crew's agents.
//!
//! Defines `web_search` and `youtube_channel_search` as [`genai::chat::Tool`]
//! schemas and routes tool calls to their implementations.
//!
//! Tool errors are always returned as structured JSON strings (never panics or
//! `Err` variants) so the model can observe the error and react.

pub mod web_search;
pub mod youtube;

use genai::chat::{Tool, ToolCall};
use serde_json::json;

use crate::config::AppConfig;

/// The tools an agent can be equipped with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolKind {
    WebSearch,
    YoutubeChannelSearch,
}

impl ToolKind {
    /// Function name the model uses to call this tool.
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::WebSearch => "web_search",
            ToolKind::YoutubeChannelSearch => "youtube_channel_search",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ToolKind::WebSearch => {
                "Search the internet for current information such as music industry \
                 trends, popular hashtags, and competitor activity. Returns a JSON array \
                 of results with title, url, and snippet."
            }
            ToolKind::YoutubeChannelSearch => {
                "Search the videos of a YouTube channel or artist for a topic. Returns \
                 JSON with the channel name and a list of videos (title, url, snippet, \
                 and when known channel, date, duration)."
            }
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "web_search" => Some(ToolKind::WebSearch),
            "youtube_channel_search" => Some(ToolKind::YoutubeChannelSearch),
            _ => None,
        }
    }

    /// Function-calling schema for this tool.
    pub fn definition(self) -> Tool {
        let schema = match self {
            ToolKind::WebSearch => json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "The search query"
                    }
                },
                "required": ["query"]
            }),
            ToolKind::YoutubeChannelSearch => json!({
                "type": "object",
                "properties": {
                    "channel": {
                        "type": "string",
                        "description": "Channel name, @handle, or channel URL"
                    },
                    "query": {
                        "type": "string",
                        "description": "What to look for in the channel's videos"
                    }
                },
                "required": ["channel", "query"]
            }),
        };

        Tool::new(self.name())
            .with_description(self.description())
            .with_schema(schema)
    }
}

/// Define the schemas for a set of tools.
pub fn define_tools(kinds: &[ToolKind]) -> Vec<Tool> {
    kinds.iter().map(|k| k.definition()).collect()
}

/// Search provider settings shared by both tools.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub serper_api_key: Option<String>,
    pub result_count: usize,
    pub rate_limit_secs: f64,
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            serper_api_key: config.serper_api_key.clone(),
            result_count: config.search_results,
            rate_limit_secs: config.search_rate_limit_secs,
        }
    }
}

/// Dispatch a tool call to its implementation.
///
/// Only tools listed in `allowed` (the calling agent's tools) are executed.
/// Always returns a `String`: either a JSON success payload or a JSON error
/// object `{"error": "..."}`.
pub async fn dispatch_tool_call(
    call: &ToolCall,
    allowed: &[ToolKind],
    settings: &SearchSettings,
) -> String {
    let kind = match ToolKind::from_name(&call.fn_name) {
        Some(kind) if allowed.contains(&kind) => kind,
        Some(_) => {
            return json!({"error": format!("Tool not available to this agent: {}", call.fn_name)})
                .to_string();
        }
        None => return json!({"error": format!("Unknown tool: {}", call.fn_name)}).to_string(),
    };

    match kind {
        ToolKind::WebSearch => dispatch_web_search(call, settings).await,
        ToolKind::YoutubeChannelSearch => dispatch_youtube_search(call, settings).await,
    }
}

fn string_arg<'a>(call: &'a ToolCall, name: &str) -> Option<&'a str> {
    call.fn_arguments
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

async fn dispatch_web_search(call: &ToolCall, settings: &SearchSettings) -> String {
    let Some(query) = string_arg(call, "query") else {
        return json!({"error": "web_search: missing or invalid 'query' argument"}).to_string();
    };

    let results = match settings.serper_api_key.as_deref() {
        Some(key) => {
            web_search::rate_limited_serper_search(
                query,
                settings.result_count,
                key,
                settings.rate_limit_secs,
            )
            .await
        }
        None => {
            web_search::rate_limited_ddg_search(
                query,
                settings.result_count,
                settings.rate_limit_secs,
            )
            .await
        }
    };

    match results {
        Ok(results) => serde_json::to_string(&results).unwrap_or_else(|e| {
            json!({"error": format!("web_search: failed to serialize results: {e}")}).to_string()
        }),
        Err(e) => json!({"error": format!("web_search: {e}")}).to_string(),
    }
}

async fn dispatch_youtube_search(call: &ToolCall, settings: &SearchSettings) -> String {
    let Some(channel) = string_arg(call, "channel") else {
        return json!({"error": "youtube_channel_search: missing or invalid 'channel' argument"})
            .to_string();
    };
    let query = string_arg(call, "query").unwrap_or("");

    match youtube::search_channel_videos(channel, query, settings).await {
        Ok(report) => serde_json::to_string(&report).unwrap_or_else(|e| {
            json!({"error": format!("youtube_channel_search: failed to serialize results: {e}")})
                .to_string()
        }),
        Err(e) => json!({"error": format!("youtube_channel_search: {e}")}).to_string(),
    }
}
