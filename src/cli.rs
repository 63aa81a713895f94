use std::net::SocketAddr;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app_state::AppState;
use crate::config_loader::load_config;
use crate::{simulator, simweb};

#[derive(Parser)]
#[command(name = "simguard", about = "SIMGuard Central demo backend", version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP/WebSocket service
    Serve {
        /// Bind host, overrides the configured value
        #[arg(long)]
        host: Option<String>,
        /// Bind port, overrides the configured value
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective merged configuration
    Config,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { host, port } => serve(host, port).await,
        Commands::Config => {
            let config = load_config()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

async fn serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let simulator_enabled = config.simulator.enabled;

    let state = Arc::new(AppState::new(config));
    if simulator_enabled {
        simulator::spawn(state.clone());
    }

    let app = simweb::build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "SIMGuard Central listening");
    axum::serve(listener, app).await?;
    Ok(())
}
