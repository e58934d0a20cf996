use clap::{Parser, Subcommand};
use colored::Colorize;
use eyre::{Context, Result};
use std::sync::Arc;
use taskflow::Store;
use taskflow::api::{self, AppState};
use taskflow::config::{Config, ConfigArgs};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "taskflow")]
#[command(about = "TaskFlow - personal task manager service")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API (default)
    Serve,

    /// Print the resolved configuration as YAML
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Config => {
            print!("{}", serde_yaml::to_string(&config)?);
            Ok(())
        }
    }
}

async fn serve(config: Config) -> Result<()> {
    let store = if config.seed_default_categories {
        Store::with_default_categories()?
    } else {
        Store::new()
    };
    let state = Arc::new(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    let addr = listener.local_addr()?;

    tracing::info!(addr = %addr, "starting taskflow");
    println!("{} listening on {}", "taskflow".green().bold(), format!("http://{}", addr).cyan());

    api::serve(listener, state, shutdown_signal()).await?;

    println!("{}", "taskflow stopped".yellow());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
