use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dispidi::config::Config;
use dispidi::server::{AppState, build_app};

#[derive(Parser)]
#[command(name = "dispidi", version, about = "WhatsApp mass-dispatch relay")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the relay server.
    Serve {
        /// Path to the YAML configuration file.
        #[arg(long, default_value = "dispidi.yaml")]
        config: PathBuf,
        /// Override the configured bind host.
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port.
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve { config, host, port } => serve(config, host, port).await,
    }
}

async fn serve(config_path: PathBuf, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load(&config_path)
        .await
        .with_context(|| format!("loading {}", config_path.display()))?;
    config.apply_env();
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let request_timeout = config.server.request_timeout_seconds;

    info!(
        gateway = %config.gateway.base_url,
        session = %config.gateway.session,
        "starting dispidi"
    );

    let shutdown = CancellationToken::new();
    let state = AppState::new(config, shutdown.clone());
    let app = build_app(state, request_timeout);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
            shutdown.cancel();
        })
        .await
        .context("server error")?;

    Ok(())
}
