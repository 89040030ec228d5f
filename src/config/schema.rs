use serde::Deserialize;
use std::path::PathBuf;

/// The TOML file structure for encore.toml.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub general: Option<GeneralConfig>,
    pub server: Option<ServerConfig>,
    pub search: Option<SearchConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize)]
pub struct GeneralConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_iterations: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub bind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub results: Option<usize>,
    pub rate_limit_secs: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    pub run_log_dir: Option<String>,
}

/// Fully-resolved runtime configuration. All fields have values except the
/// optional search credential.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: String,
    pub temperature: f64,
    /// Tool-calling rounds allowed per task before a final answer is forced.
    pub max_iterations: usize,
    pub bind: String,
    pub search_results: usize,
    pub search_rate_limit_secs: f64,
    pub run_log_dir: PathBuf,
    /// Serper API key. `None` falls back to DuckDuckGo.
    pub serper_api_key: Option<String>,
}

/// Partial config used during merge. All fields are Option so that
/// missing fields don't override lower-priority values.
#[derive(Debug, Clone, Default)]
pub struct PartialConfig {
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_iterations: Option<usize>,
    pub bind: Option<String>,
    pub search_results: Option<usize>,
    pub search_rate_limit_secs: Option<f64>,
    pub run_log_dir: Option<PathBuf>,
    pub serper_api_key: Option<String>,
}

impl ConfigFile {
    /// Flatten the sectioned file layout into a mergeable layer.
    pub fn to_partial(&self) -> PartialConfig {
        let general = self.general.as_ref();
        let search = self.search.as_ref();
        PartialConfig {
            model: general.and_then(|g| g.model.clone()),
            temperature: general.and_then(|g| g.temperature),
            max_iterations: general.and_then(|g| g.max_iterations),
            bind: self.server.as_ref().and_then(|s| s.bind.clone()),
            search_results: search.and_then(|s| s.results),
            search_rate_limit_secs: search.and_then(|s| s.rate_limit_secs),
            run_log_dir: self
                .logging
                .as_ref()
                .and_then(|l| l.run_log_dir.as_ref())
                .map(PathBuf::from),
            serper_api_key: None,
        }
    }
}
