//! CRM Gateway - authorization-guarded CRM mutation service

#![allow(missing_docs)]

use clap::Parser;
use crm_gateway::utils::init_tracing;
use crm_gateway::{Config, Gateway};
use std::path::PathBuf;
use std::process::ExitCode;

/// Command-line arguments
#[derive(Debug, Parser)]
#[command(name = "crm-gateway", version, about)]
struct Cli {
    /// YAML configuration file; environment variables are used when omitted
    #[arg(short, long, env = "CRM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(long)]
    port: Option<u16>,
}

async fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path).await?,
        None => Config::from_env()?,
    };

    if let Some(host) = &cli.host {
        config.gateway.server.host = host.clone();
    }
    if let Some(port) = cli.port {
        config.gateway.server.port = port;
    }
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli).await?;
    init_tracing(config.logging())?;

    Gateway::new(config)?.run().await?;
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Display, not Debug, keeps multi-line messages readable
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
