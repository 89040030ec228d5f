//! YouTube channel search.
//!
//! Finds videos published by a given channel or artist so the content agent
//! can study what has worked for them. Uses Serper's video vertical when a
//! key is configured, otherwise DuckDuckGo restricted to `site:youtube.com`.

use serde::Serialize;
use serde_json::Value;

use super::web_search::{
    SearchResult, enforce_serper_rate_limit, rate_limited_ddg_search, serper_request,
};
use super::SearchSettings;

const SERPER_VIDEOS_URL: &str = "https://google.serper.dev/videos";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YoutubeVideo {
    pub title: String,
    pub url: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
}

/// Tool payload returned to the model.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelSearchReport {
    pub channel: String,
    pub videos: Vec<YoutubeVideo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Reduce a channel reference to the name used for searching and matching.
///
/// Accepts plain names ("Ed Sheeran"), handles ("@edsheeran") and channel
/// URLs ("https://www.youtube.com/@edsheeran/videos",
/// "https://www.youtube.com/channel/UC0C-w0YjGpqDXGB8IHb662A").
pub fn channel_search_name(channel: &str) -> String {
    let trimmed = channel.trim();
    let path = trimmed
        .split_once("youtube.com/")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    let segment = path
        .trim_start_matches("c/")
        .trim_start_matches("user/")
        .trim_start_matches("channel/")
        .split(['/', '?'])
        .next()
        .unwrap_or(path);
    segment.trim_start_matches('@').trim().to_string()
}

/// Search a channel's videos for a topic.
pub async fn search_channel_videos(
    channel: &str,
    query: &str,
    settings: &SearchSettings,
) -> Result<ChannelSearchReport, String> {
    let name = channel_search_name(channel);
    if name.is_empty() {
        return Err("channel name is empty".to_string());
    }
    let search = format!("{name} {query}").trim().to_string();

    match settings.serper_api_key.as_deref() {
        Some(key) => {
            enforce_serper_rate_limit(settings.rate_limit_secs).await;
            let body = serper_request(SERPER_VIDEOS_URL, &search, settings.result_count, key)
                .await?;
            Ok(build_report(&name, parse_serper_videos(&body)))
        }
        None => {
            let results = rate_limited_ddg_search(
                &format!("site:youtube.com {search}"),
                settings.result_count,
                settings.rate_limit_secs,
            )
            .await?;
            Ok(build_report(&name, ddg_to_videos(results)))
        }
    }
}

/// Keep YouTube videos from the named channel. When none match the channel
/// exactly, fall back to every YouTube result and say so.
fn build_report(name: &str, videos: Vec<YoutubeVideo>) -> ChannelSearchReport {
    let youtube: Vec<YoutubeVideo> = videos.into_iter().filter(is_youtube_video).collect();
    let needle = name.to_lowercase();

    let matching: Vec<YoutubeVideo> = youtube
        .iter()
        .filter(|v| {
            v.channel
                .as_deref()
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| {
                    let c = c.to_lowercase();
                    c.contains(&needle) || needle.contains(&c)
                })
                .unwrap_or_else(|| v.title.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect();

    if matching.is_empty() && !youtube.is_empty() {
        ChannelSearchReport {
            channel: name.to_string(),
            videos: youtube,
            note: Some(format!(
                "No videos were attributed to '{name}'; showing related YouTube results."
            )),
        }
    } else {
        ChannelSearchReport {
            channel: name.to_string(),
            videos: matching,
            note: None,
        }
    }
}

fn is_youtube_video(video: &YoutubeVideo) -> bool {
    video.url.contains("youtube.com/") || video.url.contains("youtu.be/")
}

/// Extract videos from the `videos` array of a Serper video response.
fn parse_serper_videos(body: &Value) -> Vec<YoutubeVideo> {
    let text = |v: &Value, key: &str| v[key].as_str().map(str::to_string);

    body["videos"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| {
                    Some(YoutubeVideo {
                        title: text(v, "title")?,
                        url: text(v, "link")?,
                        snippet: text(v, "snippet").unwrap_or_default(),
                        channel: text(v, "channel"),
                        date: text(v, "date"),
                        duration: text(v, "duration"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// DuckDuckGo results carry no channel metadata; matching falls back to
/// the title.
fn ddg_to_videos(results: Vec<SearchResult>) -> Vec<YoutubeVideo> {
    results
        .into_iter()
        .map(|r| YoutubeVideo {
            title: r.title,
            url: r.url,
            snippet: r.snippet,
            channel: None,
            date: None,
            duration: None,
        })
        .collect()
}
