use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::AsyncReadExt;

use cors_gateway::config::load_config;
use cors_gateway::http::{FunctionEvent, FunctionResult, InboundRequest};
use cors_gateway::observability::init_logging;
use cors_gateway::proxy::{Gateway, GatewaySettings};
use cors_gateway::upstream::HttpUpstream;

#[derive(Parser)]
#[command(name = "gateway-invoke")]
#[command(about = "Run one function event through the gateway and print the result", long_about = None)]
struct Cli {
    /// Event JSON file; reads stdin when omitted.
    #[arg(short, long)]
    event: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result on a single line.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.observability);

    let raw = match &cli.event {
        Some(path) => tokio::fs::read_to_string(path).await?,
        None => {
            let mut raw = String::new();
            tokio::io::stdin().read_to_string(&mut raw).await?;
            raw
        }
    };
    let event: FunctionEvent = serde_json::from_str(&raw)?;

    let gateway = Gateway::new(
        GatewaySettings::from_config(&config),
        Arc::new(HttpUpstream::new()?),
    );
    let response = gateway.handle(InboundRequest::from(event)).await;
    let result = FunctionResult::from(response);

    let output = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{}", output);

    Ok(())
}
