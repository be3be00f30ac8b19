//! Shortlinks redirect service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http server ──▶ routing (resolver) ──▶ store (LMDB)
//!                          │                                     ▲
//!                          └──▶ admin API ──▶ registry ──────────┘
//!                                                ▲
//!     shortlinks import links.csv ───────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use shortlinks::config::{load_config, validate_config, ConfigError, ServiceConfig};
use shortlinks::http::HttpServer;
use shortlinks::lifecycle::{signals, startup, Shutdown};
use shortlinks::observability::{logging, metrics};
use shortlinks::registry::{import::import_file, Registry};

#[derive(Parser)]
#[command(name = "shortlinks")]
#[command(about = "Go-link style redirect service", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Registry directory (overrides storage.path)
    #[arg(short, long)]
    data: Option<String>,

    /// Bind address (overrides listener.bind_address)
    #[arg(short, long)]
    bind: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve redirects (default)
    Serve,
    /// Load `source;destination` records into the registry
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(data) = cli.data {
        config.storage.path = data;
    }
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }
    validate_config(&config).map_err(ConfigError::Validation)?;

    logging::init_logging(&config.observability.log_level);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "shortlinks starting");
    startup::log_config(&config);

    let store = startup::open_store(&config)?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Import { file } => {
            let registry = Registry::new(store);
            let count = import_file(&registry, &file)?;
            tracing::info!(count, file = %file.display(), "Import complete");
        }
        Commands::Serve => {
            if config.observability.metrics_enabled {
                let addr: SocketAddr = config.observability.metrics_address.parse()?;
                metrics::init_metrics(addr);
            }

            let listener = TcpListener::bind(&config.listener.bind_address).await?;
            tracing::info!(
                address = %listener.local_addr()?,
                "Listening for connections"
            );

            let shutdown = Shutdown::new();
            let shutdown_rx = shutdown.subscribe();
            signals::spawn_signal_listener(shutdown);

            let server = HttpServer::new(config, store);
            server.run(listener, shutdown_rx).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
