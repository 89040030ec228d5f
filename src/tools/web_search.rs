//! Web search providers for the agents.
//!
//! Provides Serper (Google results, API key required) and DuckDuckGo
//! (zero-config, HTML scraping) as search backends. Both produce structured
//! [`SearchResult`] lists; the tool layer serializes them for the model.
//!
//! Rate-limited wrappers enforce minimum delays between requests to avoid
//! being blocked by upstream providers.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::{Value, json};

const SERPER_SEARCH_URL: &str = "https://google.serper.dev/search";
const DDG_LITE_URL: &str = "https://lite.duckduckgo.com/lite/";

/// A single search result with title, URL, and snippet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// Search DuckDuckGo via the lite HTML endpoint.
///
/// Parses result links, titles, and snippets from the table-based HTML
/// layout using CSS selectors.
pub async fn search_duckduckgo(query: &str, count: usize) -> Result<Vec<SearchResult>, String> {
    let client = reqwest::Client::builder()
        .user_agent("Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0")
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| format!("failed to build client: {e}"))?;

    let resp = client
        .get(DDG_LITE_URL)
        .query(&[("q", query)])
        .send()
        .await
        .map_err(|e| format!("DuckDuckGo request failed: {e}"))?;

    let html = resp
        .text()
        .await
        .map_err(|e| format!("failed to read DuckDuckGo response: {e}"))?;

    Ok(parse_ddg_lite_html(&html, count))
}

/// Parse DuckDuckGo Lite HTML to extract search results.
///
/// The DDG lite page uses a table layout where result rows contain:
/// - A link (`<a>`) with the result URL and title text
/// - A subsequent row with the snippet text in a `<td>` with class `result-snippet`
fn parse_ddg_lite_html(html: &str, count: usize) -> Vec<SearchResult> {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);

    let (Ok(link_selector), Ok(snippet_selector)) = (
        Selector::parse("a.result-link"),
        Selector::parse("td.result-snippet"),
    ) else {
        return Vec::new();
    };

    let snippets: Vec<_> = document.select(&snippet_selector).collect();

    document
        .select(&link_selector)
        .enumerate()
        .filter_map(|(i, link)| {
            let title = link.text().collect::<String>().trim().to_string();
            let url = link.value().attr("href").unwrap_or("").trim().to_string();

            // Skip empty/invalid results
            if title.is_empty() || url.is_empty() {
                return None;
            }

            let snippet = snippets
                .get(i)
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();

            Some(SearchResult { title, url, snippet })
        })
        .take(count)
        .collect()
}

/// POST a query to a Serper endpoint and return the decoded JSON body.
///
/// Shared by web search and video search, which differ only in URL and in
/// the response array they read.
pub(crate) async fn serper_request(
    url: &str,
    query: &str,
    count: usize,
    api_key: &str,
) -> Result<Value, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(15))
        .build()
        .map_err(|e| format!("failed to build client: {e}"))?;

    let resp = client
        .post(url)
        .header("X-API-KEY", api_key)
        .json(&json!({ "q": query, "num": count }))
        .send()
        .await
        .map_err(|e| format!("Serper request failed: {e}"))?;

    let status = resp.status();

    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err("Serper API key is invalid or expired".to_string());
    }

    if status.as_u16() == 429 {
        return Err("Serper rate limit exceeded, try again later".to_string());
    }

    if !status.is_success() {
        return Err(format!("Serper HTTP {status}"));
    }

    resp.json()
        .await
        .map_err(|e| format!("failed to parse Serper response: {e}"))
}

/// Search Google through the Serper REST API.
pub async fn search_serper(
    query: &str,
    count: usize,
    api_key: &str,
) -> Result<Vec<SearchResult>, String> {
    let body = serper_request(SERPER_SEARCH_URL, query, count, api_key).await?;
    Ok(parse_serper_organic(&body, count))
}

/// Extract results from the `organic` array of a Serper search response.
fn parse_serper_organic(body: &Value, count: usize) -> Vec<SearchResult> {
    body["organic"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|r| {
                    Some(SearchResult {
                        title: r["title"].as_str()?.to_string(),
                        url: r["link"].as_str()?.to_string(),
                        snippet: r["snippet"].as_str().unwrap_or("").to_string(),
                    })
                })
                .take(count)
                .collect()
        })
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

/// Global last-request tracker for DuckDuckGo.
static DDG_LAST_REQUEST: Mutex<Option<Instant>> = Mutex::new(None);

/// Global last-request tracker for Serper (shared by search and videos).
static SERPER_LAST_REQUEST: Mutex<Option<Instant>> = Mutex::new(None);

/// Enforce a minimum delay then search DuckDuckGo.
pub async fn rate_limited_ddg_search(
    query: &str,
    count: usize,
    rate_limit_secs: f64,
) -> Result<Vec<SearchResult>, String> {
    enforce_rate_limit(&DDG_LAST_REQUEST, rate_limit_secs).await;
    search_duckduckgo(query, count).await
}

/// Enforce a minimum delay then search Serper.
pub async fn rate_limited_serper_search(
    query: &str,
    count: usize,
    api_key: &str,
    rate_limit_secs: f64,
) -> Result<Vec<SearchResult>, String> {
    enforce_serper_rate_limit(rate_limit_secs).await;
    search_serper(query, count, api_key).await
}

pub(crate) async fn enforce_serper_rate_limit(rate_limit_secs: f64) {
    enforce_rate_limit(&SERPER_LAST_REQUEST, rate_limit_secs).await;
}

/// Wait if necessary to enforce a minimum interval between requests,
/// then update the last-request timestamp.
async fn enforce_rate_limit(tracker: &Mutex<Option<Instant>>, min_secs: f64) {
    // Negative, non-finite or overflowing intervals disable the wait.
    let min_interval = Duration::try_from_secs_f64(min_secs).unwrap_or(Duration::ZERO);

    // Read the last request time (lock released immediately).
    let remaining = {
        let guard = tracker.lock().unwrap_or_else(|e| e.into_inner());
        guard.and_then(|last| min_interval.checked_sub(last.elapsed()))
    };

    // Sleep outside the lock if needed.
    if let Some(wait) = remaining {
        tokio::time::sleep(wait).await;
    }

    let mut guard = tracker.lock().unwrap_or_else(|e| e.into_inner());
    *guard = Some(Instant::now());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ddg_empty_html() {
        let results = parse_ddg_lite_html("<html><body></body></html>", 10);
        assert!(results.is_empty());
    }

    #[test]
    fn parse_ddg_with_results() {
        let html = r#"
        <html><body>
        <table>
            <tr>
                <td><a class="result-link" href="https://example.com/charts">Billboard Hot 100</a></td>
            </tr>
            <tr>
                <td class="result-snippet">This week's top songs</td>
            </tr>
            <tr>
                <td><a class="result-link" href="https://other.com/tiktok">TikTok music trends</a></td>
            </tr>
            <tr>
                <td class="result-snippet">Sounds going viral</td>
            </tr>
        </table>
        </body></html>
        "#;

        let results = parse_ddg_lite_html(html, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Billboard Hot 100");
        assert_eq!(results[0].url, "https://example.com/charts");
        assert_eq!(results[0].snippet, "This week's top songs");
        assert_eq!(results[1].url, "https://other.com/tiktok");
    }

    #[test]
    fn parse_ddg_respects_count_limit() {
        let html = r#"
        <table>
            <tr><td><a class="result-link" href="https://a.com">A</a></td></tr>
            <tr><td class="result-snippet">Snippet A</td></tr>
            <tr><td><a class="result-link" href="https://b.com">B</a></td></tr>
            <tr><td class="result-snippet">Snippet B</td></tr>
            <tr><td><a class="result-link" href="https://c.com">C</a></td></tr>
            <tr><td class="result-snippet">Snippet C</td></tr>
        </table>
        "#;

        let results = parse_ddg_lite_html(html, 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].title, "B");
    }

    #[test]
    fn parse_serper_organic_results() {
        let body = json!({
            "searchParameters": {"q": "indie pop marketing"},
            "organic": [
                {"title": "Indie Pop Promo Guide", "link": "https://a.com", "snippet": "Step one", "position": 1},
                {"title": "No link here"},
                {"title": "Hashtags for 2024", "link": "https://b.com", "position": 3}
            ]
        });

        let results = parse_serper_organic(&body, 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].snippet, "Step one");
        assert_eq!(results[1].title, "Hashtags for 2024");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn parse_serper_without_organic_is_empty() {
        assert!(parse_serper_organic(&json!({"answerBox": {}}), 5).is_empty());
    }

    #[tokio::test]
    async fn rate_limit_waits_between_requests() {
        static TRACKER: Mutex<Option<Instant>> = Mutex::new(None);

        enforce_rate_limit(&TRACKER, 0.2).await;
        let start = Instant::now();
        enforce_rate_limit(&TRACKER, 0.2).await;

        assert!(start.elapsed() >= Duration::from_millis(150));
    }

    #[tokio::test]
    async fn unrepresentable_intervals_do_not_wait() {
        static TRACKER: Mutex<Option<Instant>> = Mutex::new(None);

        let start = Instant::now();
        for secs in [f64::INFINITY, f64::NAN, -1.0, 1e30] {
            enforce_rate_limit(&TRACKER, secs).await;
        }

        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(TRACKER.lock().unwrap().is_some());
    }
}
