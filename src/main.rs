//! Clochette main entry point

use anyhow::Context;
use clap::Parser;
use clochette_api::start_server;
use clochette_client::{HttpBackend, MemoryBackend};
use clochette_config::Config;
use clochette_core::BackendRef;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "clochette")]
#[command(version = "0.1.0")]
#[command(about = "Server-rendered point of sale and inventory front end for the Clochette bar", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Serve against a seeded in-memory backend instead of the REST API
    #[arg(long)]
    offline: bool,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = Config::load(args.config.clone())
        .map_err(|e| anyhow::anyhow!("{}", e.to_details()))
        .with_context(|| format!("Failed to load configuration from {}", args.config.display()))?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str())).init();
    log::info!("Config loaded from {}", args.config.display());

    let backend: BackendRef = if args.offline {
        log::warn!("Offline mode: using the seeded in-memory backend");
        Arc::new(MemoryBackend::seeded())
    } else {
        Arc::new(HttpBackend::new(&config.backend)?)
    };

    let rt = Runtime::new()?;
    rt.block_on(start_server(config, backend))
}
