use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "encore", version, about = "Music marketing planner backed by an LLM crew")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the planner web page
    Serve {
        /// Address to listen on (e.g., "127.0.0.1:8501")
        #[arg(short, long)]
        bind: Option<String>,

        /// LLM model name (e.g., "gpt-4-turbo"). OpenAI models need
        /// OPENAI_API_KEY; other providers use genai's own key variables.
        #[arg(short, long)]
        model: Option<String>,

        /// Path to config file (overrides default search)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Generate one marketing plan and print it to stdout
    Plan {
        /// Name of the new single/album
        #[arg(short, long)]
        name: String,

        /// Desired style/tone (casual, edgy, etc.)
        #[arg(short, long)]
        style: String,

        /// YouTube channel or artist name to analyze
        #[arg(long, default_value = "")]
        channel: String,

        /// LLM model name (e.g., "gpt-4-turbo"). OpenAI models need
        /// OPENAI_API_KEY; other providers use genai's own key variables.
        #[arg(short, long)]
        model: Option<String>,

        /// Path to config file (overrides default search)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

impl Commands {
    /// Explicit config file passed on the command line, if any.
    pub fn config_path(&self) -> Option<&PathBuf> {
        match self {
            Commands::Serve { config, .. } | Commands::Plan { config, .. } => config.as_ref(),
        }
    }
}
