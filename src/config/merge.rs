use super::schema::{AppConfig, PartialConfig};
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.5;
pub const DEFAULT_MAX_ITERATIONS: usize = 6;
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_SEARCH_RESULTS: usize = 10;
pub const DEFAULT_SEARCH_RATE_LIMIT_SECS: f64 = 1.0;
pub const MAX_SEARCH_RATE_LIMIT_SECS: f64 = 3600.0;

impl PartialConfig {
    /// Merge self with a lower-priority fallback.
    /// Self's non-None values take precedence.
    pub fn with_fallback(self, fallback: PartialConfig) -> PartialConfig {
        PartialConfig {
            model: self.model.or(fallback.model),
            temperature: self.temperature.or(fallback.temperature),
            max_iterations: self.max_iterations.or(fallback.max_iterations),
            bind: self.bind.or(fallback.bind),
            search_results: self.search_results.or(fallback.search_results),
            search_rate_limit_secs: self
                .search_rate_limit_secs
                .or(fallback.search_rate_limit_secs),
            run_log_dir: self.run_log_dir.or(fallback.run_log_dir),
            serper_api_key: self.serper_api_key.or(fallback.serper_api_key),
        }
    }

    /// Convert to AppConfig, filling any remaining gaps with defaults.
    pub fn finalize(self) -> AppConfig {
        AppConfig {
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature: self.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            max_iterations: self.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS),
            bind: self.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
            search_results: self.search_results.unwrap_or(DEFAULT_SEARCH_RESULTS),
            search_rate_limit_secs: self
                .search_rate_limit_secs
                .filter(|secs| valid_rate_limit(*secs))
                .unwrap_or(DEFAULT_SEARCH_RATE_LIMIT_SECS),
            run_log_dir: self
                .run_log_dir
                .unwrap_or_else(|| PathBuf::from(".encore-logs")),
            serper_api_key: self.serper_api_key.filter(|k| !k.trim().is_empty()),
        }
    }
}

fn valid_rate_limit(secs: f64) -> bool {
    let valid = (0.0..=MAX_SEARCH_RATE_LIMIT_SECS).contains(&secs);
    if !valid {
        tracing::warn!(
            "Ignoring search rate_limit_secs = {secs}; expected 0 to {MAX_SEARCH_RATE_LIMIT_SECS}"
        );
    }
    valid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_layers_finalize_to_defaults() {
        let config = PartialConfig::default().finalize();
        assert_eq!(config.model, "gpt-4-turbo");
        assert_eq!(config.temperature, 0.5);
        assert_eq!(config.bind, "127.0.0.1:8501");
        assert_eq!(config.run_log_dir, PathBuf::from(".encore-logs"));
        assert!(config.serper_api_key.is_none());
    }

    #[test]
    fn higher_layer_wins_field_by_field() {
        let cli = PartialConfig {
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let file = PartialConfig {
            model: Some("gpt-3.5-turbo".to_string()),
            temperature: Some(0.2),
            ..Default::default()
        };

        let config = cli.with_fallback(file).finalize();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.temperature, 0.2);
        assert_eq!(config.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn blank_serper_key_is_treated_as_absent() {
        let config = PartialConfig {
            serper_api_key: Some("   ".to_string()),
            ..Default::default()
        }
        .finalize();
        assert!(config.serper_api_key.is_none());
    }

    #[test]
    fn out_of_range_rate_limit_falls_back_to_default() {
        for secs in [f64::INFINITY, f64::NAN, -0.5, 1e30] {
            let config = PartialConfig {
                search_rate_limit_secs: Some(secs),
                ..Default::default()
            }
            .finalize();
            assert_eq!(config.search_rate_limit_secs, DEFAULT_SEARCH_RATE_LIMIT_SECS);
        }

        let config = PartialConfig {
            search_rate_limit_secs: Some(0.0),
            ..Default::default()
        }
        .finalize();
        assert_eq!(config.search_rate_limit_secs, 0.0);
    }
}
