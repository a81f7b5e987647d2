//! CORS forwarding gateway
//!
//! Relays browser requests to a backend that does not speak CORS, and adds
//! the cross-origin headers on the way back.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                   CORS GATEWAY                     │
//!                     │                                                    │
//!  Browser Request    │  ┌─────────┐   ┌──────────┐   ┌──────────────┐    │
//!  ───────────────────┼─▶│  http   │──▶│  proxy   │──▶│   upstream   │────┼──▶ Backend
//!                     │  │ server  │   │ gateway  │   │   (reqwest)  │    │
//!                     │  └─────────┘   └────┬─────┘   └──────────────┘    │
//!                     │                     │                              │
//!  Browser Response   │  ┌─────────┐   ┌────▼─────┐                       │
//!  ◀──────────────────┼──│  http   │◀──│ response │◀── headers filtered,  │
//!                     │  │ server  │   │ encoder  │    CORS merged        │
//!                     │  └─────────┘   └──────────┘                       │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use cors_gateway::config::load_config;
use cors_gateway::observability::{init_logging, metrics};
use cors_gateway::upstream::HttpUpstream;
use cors_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "cors-gateway")]
#[command(about = "Forward browser requests to a backend and add CORS headers", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address.
    #[arg(short, long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind.to_string();
    }

    init_logging(&config.observability);

    tracing::info!("cors-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    match config.upstream.backend_url.as_deref() {
        Some(url) => tracing::info!(
            backend_url = %url,
            allow_origin = %config.cors.allow_origin,
            "Configuration loaded"
        ),
        None => tracing::warn!("No backend URL configured; forwarded requests will answer 500"),
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let upstream = Arc::new(HttpUpstream::new()?);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config, upstream);
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
