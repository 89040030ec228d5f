pub mod merge;
pub mod schema;

pub use schema::*;

use crate::cli::{Cli, Commands};
use crate::error::ConfigError;
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Environment variable holding the OpenAI key. genai resolves it itself for
/// OpenAI models; we only check that it is present.
pub const OPENAI_KEY_VAR: &str = "OPENAI_API_KEY";

/// Environment variable holding the Serper search key.
pub const SERPER_KEY_VAR: &str = "SERPER_API_KEY";

/// Load configuration by merging CLI, file, environment, and global sources.
/// Precedence: CLI > local/explicit config > global config > defaults.
/// Credentials only ever come from the environment.
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    // Layer 1: Global config (~/.config/encore/encore.toml or platform equivalent)
    let global = load_global_config();

    // Layer 2: Explicit --config file, or ./encore.toml if present
    let local = match cli.command.config_path() {
        Some(path) => load_explicit_config(path)?,
        None => load_toml_file(Path::new("encore.toml")).unwrap_or_default(),
    };

    // Layer 3: CLI args
    let cli_partial = cli_to_partial(cli);

    let env = PartialConfig {
        serper_api_key: std::env::var(SERPER_KEY_VAR).ok(),
        ..Default::default()
    };

    let config = cli_partial
        .with_fallback(local)
        .with_fallback(global)
        .with_fallback(env)
        .finalize();

    Ok(config)
}

/// Model name prefixes genai routes to its OpenAI adapter.
const OPENAI_MODEL_PREFIXES: &[&str] = &["gpt", "chatgpt", "o1", "o3", "o4", "codex"];

/// Whether `model` is served by OpenAI, either by an explicit `openai::`
/// namespace or by one of OpenAI's model name prefixes.
pub fn is_openai_model(model: &str) -> bool {
    match model.split_once("::") {
        Some((namespace, _)) => namespace == "openai",
        None => OPENAI_MODEL_PREFIXES
            .iter()
            .any(|prefix| model.starts_with(prefix)),
    }
}

/// Fail early when an OpenAI model is selected but its credential is
/// missing, instead of on the first request. Other providers' keys are
/// resolved by genai when the first request is made.
pub fn require_llm_credentials(model: &str) -> Result<(), ConfigError> {
    if !is_openai_model(model) {
        tracing::debug!(model, "Skipping {OPENAI_KEY_VAR} check for non-OpenAI model");
        return Ok(());
    }
    match std::env::var(OPENAI_KEY_VAR) {
        Ok(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::MissingCredential {
            var: OPENAI_KEY_VAR.to_string(),
        }),
    }
}

/// Load global config from the platform-specific config directory.
/// Returns empty PartialConfig if file not found.
fn load_global_config() -> PartialConfig {
    match global_config_path() {
        Some(p) => load_toml_file(&p).unwrap_or_default(),
        None => {
            tracing::debug!("Could not determine global config directory");
            PartialConfig::default()
        }
    }
}

/// Load a config file the user named explicitly. Unlike discovered files,
/// a missing or malformed explicit file is an error.
fn load_explicit_config(path: &Path) -> Result<PartialConfig, ConfigError> {
    let contents = std::fs::read_to_string(path)?;
    let file = parse_config(&contents, path)?;
    tracing::info!("Loaded config from {}", path.display());
    Ok(file.to_partial())
}

/// Parse config file contents, attributing errors to `path`.
pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile, ConfigError> {
    toml::from_str::<ConfigFile>(contents).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and parse a discovered TOML config file into a PartialConfig.
/// Returns None on file-not-found; parse errors are logged and skipped.
fn load_toml_file(path: &Path) -> Option<PartialConfig> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            match toml::from_str::<ConfigFile>(&contents)
                .context(format!("Failed to parse {}", path.display()))
            {
                Ok(config_file) => {
                    tracing::info!("Loaded config from {}", path.display());
                    Some(config_file.to_partial())
                }
                Err(e) => {
                    tracing::warn!("Config parse error: {:#}", e);
                    None
                }
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config file at {}, using defaults", path.display());
            None
        }
        Err(e) => {
            tracing::warn!("Failed to read config at {}: {}", path.display(), e);
            None
        }
    }
}

/// Resolve the platform-specific global config path.
/// Linux: ~/.config/encore/encore.toml
/// macOS: ~/Library/Application Support/encore/encore.toml
fn global_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "encore")
        .map(|dirs| dirs.config_dir().join("encore.toml"))
}

/// Convert CLI arguments to a PartialConfig for merging.
fn cli_to_partial(cli: &Cli) -> PartialConfig {
    match &cli.command {
        Commands::Serve { bind, model, .. } => PartialConfig {
            bind: bind.clone(),
            model: model.clone(),
            ..Default::default()
        },
        Commands::Plan { model, .. } => PartialConfig {
            model: model.clone(),
            ..Default::default()
        },
    }
}
