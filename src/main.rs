use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use encore::cli::{Cli, Commands};
use encore::config::{self, AppConfig};
use encore::crew::CrewEvent;
use encore::error::ConfigError;
use encore::planner::{CrewPlanner, PlanForm, PlanGenerator};
use encore::web::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in .env next to the binary's working directory.
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "encore=info,tower_http=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("Encore starting");

    let config = config::load_config(&cli)?;
    tracing::info!(
        model = %config.model,
        search = if config.serper_api_key.is_some() { "serper" } else { "duckduckgo" },
        "Config loaded"
    );

    config::require_llm_credentials(&config.model)?;

    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Plan {
            name,
            style,
            channel,
            ..
        } => plan_once(config, PlanForm::new(name, style, channel)).await,
    }
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBind {
            addr: config.bind.clone(),
            message: e.to_string(),
        })?;

    let state = AppState::new(Arc::new(CrewPlanner::new(config)));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}

/// Headless mode: one plan, progress on stderr, markdown on stdout.
async fn plan_once(config: AppConfig, form: PlanForm) -> anyhow::Result<()> {
    let request = form.validate()?;

    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                CrewEvent::TaskStarted { name, agent_role, .. } => {
                    eprintln!("[{agent_role}] {name}");
                }
                CrewEvent::ToolCalled { fn_name, .. } => eprintln!("  [tool] {fn_name}"),
                CrewEvent::TaskCompleted { .. } => {}
            }
        }
    });

    let planner = CrewPlanner::new(config);
    let result = planner.generate(request, Some(tx)).await;
    let _ = progress.await;

    let output = result?;
    eprintln!("Marketing plan ready!");
    println!("{}", output.raw);
    Ok(())
}
