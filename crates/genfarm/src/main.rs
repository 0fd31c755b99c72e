use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

mod add_cmds;
mod claim_cmd;
mod cli;
mod delays_cmd;
mod run_cmd;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing (output to stderr, initialize only once)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init()
        .ok();

    let cli = Cli::parse();
    let data_dir = cli
        .data_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    // One shutdown signal for every loop; workers and the claim scheduler
    // observe it at each suspension point.
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("shutdown signal received");
                cancel.cancel();
            }
        });
    }

    match cli.command {
        Commands::Run { base_url } => {
            run_cmd::handle_run(&data_dir, base_url.as_deref(), cancel).await
        }
        Commands::Claim { base_url } => {
            claim_cmd::handle_claim(&data_dir, base_url.as_deref(), cancel).await
        }
        Commands::Add { cmd } => add_cmds::handle_add(&data_dir, cmd),
        Commands::Delays { cmd } => delays_cmd::handle_delays(&data_dir, cmd),
    }
}
