//! Interactive tuple space client

use clap::Parser;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tuplespaces::client::{parse_line, Command};
use tuplespaces::{ClientConfig, Coordinator};

#[derive(Parser)]
#[command(name = "tuplespaces-client")]
#[command(about = "Client for a replicated tuple space")]
#[command(version)]
struct Cli {
    /// Configuration file (default: ./tuplespaces.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Name server URL
    #[arg(long)]
    name_server: Option<String>,

    /// Sequencer URL
    #[arg(long)]
    sequencer: Option<String>,

    /// Service name to look up
    #[arg(long)]
    service: Option<String>,

    /// Only use replicas with this qualifier
    #[arg(long)]
    qualifier: Option<String>,

    /// Whole-operation retries after a replica failure
    #[arg(long)]
    retries: Option<u32>,

    /// Stagger slot between replicas, in milliseconds
    #[arg(long)]
    stagger_ms: Option<u64>,

    /// Debug logging
    #[arg(long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // File and environment first, CLI has priority
    let mut config = ClientConfig::load_from(cli.config.as_deref())?;
    if let Some(name_server) = cli.name_server {
        config.name_server = name_server;
    }
    if let Some(sequencer) = cli.sequencer {
        config.sequencer = sequencer;
    }
    if let Some(service) = cli.service {
        config.service_name = service;
    }
    if cli.qualifier.is_some() {
        config.qualifier = cli.qualifier;
    }
    if let Some(retries) = cli.retries {
        config.retries = retries;
    }
    if let Some(stagger_ms) = cli.stagger_ms {
        config.stagger_ms = stagger_ms;
    }
    if cli.debug {
        config.log_level = "debug".to_string();
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut coordinator = Coordinator::connect(&config)?;
    tracing::info!(
        "tuplespaces client {} ready (id {})",
        tuplespaces::VERSION,
        coordinator.client_id()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let line = tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => line,
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("[ERROR] {}", e);
                continue;
            }
        };

        match command {
            Command::Operation { kind, argument } => {
                match coordinator.execute(kind, &argument, config.retries).await {
                    Ok(outcome) => {
                        stdout.write_all(format!("{}\n", outcome).as_bytes()).await?;
                        stdout.flush().await?;
                    }
                    Err(e) => {
                        tracing::warn!(kind = e.kind(), "{} {} failed", kind, argument);
                        eprintln!("[ERROR] {}", e);
                    }
                }
            }
            Command::SetDelay { qualifier, delay } => {
                if let Err(e) = coordinator.set_delay(&qualifier, delay) {
                    eprintln!("[ERROR] {}", e);
                }
            }
            Command::Sleep(duration) => tokio::time::sleep(duration).await,
            Command::Exit => break,
        }
    }

    tracing::info!("Client {} shutting down", coordinator.client_id());
    Ok(())
}
