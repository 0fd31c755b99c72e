use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use gf_config::{load_delay_config, store_delay_config, DelayConfig, LoadOutcome, DELAYS_FILE};

use crate::cli::DelayCommands;

/// Resolve the delay config, falling back to defaults on a missing or
/// invalid store. Each fallback branch is logged.
pub(crate) fn effective_delays(data_dir: &Path) -> DelayConfig {
    let path = data_dir.join(DELAYS_FILE);
    match load_delay_config(&path) {
        LoadOutcome::Loaded(config) => {
            info!(
                min_ms = config.min_delay_ms,
                max_ms = config.max_delay_ms,
                initial_max_ms = config.initial_delay_max_ms,
                "delay config loaded"
            );
            config
        }
        LoadOutcome::Missing => {
            info!("no delay config; using defaults");
            DelayConfig::default()
        }
        LoadOutcome::Invalid(reason) => {
            warn!(%reason, "delay config invalid; using defaults");
            DelayConfig::default()
        }
    }
}

/// Handle the delays subcommands.
pub(crate) fn handle_delays(data_dir: &Path, cmd: DelayCommands) -> Result<()> {
    match cmd {
        DelayCommands::Show => {
            let config = effective_delays(data_dir);
            println!("min_delay_ms         = {}", config.min_delay_ms);
            println!("max_delay_ms         = {}", config.max_delay_ms);
            println!("initial_delay_max_ms = {}", config.initial_delay_max_ms);
        }
        DelayCommands::Set {
            min_delay_ms,
            max_delay_ms,
            initial_delay_max_ms,
        } => {
            let mut config = effective_delays(data_dir);
            if let Some(value) = min_delay_ms {
                config.min_delay_ms = value;
            }
            if let Some(value) = max_delay_ms {
                config.max_delay_ms = value;
            }
            if let Some(value) = initial_delay_max_ms {
                config.initial_delay_max_ms = value;
            }
            if config.min_delay_ms > config.max_delay_ms {
                anyhow::bail!(
                    "min_delay_ms ({}) must not exceed max_delay_ms ({})",
                    config.min_delay_ms,
                    config.max_delay_ms
                );
            }
            store_delay_config(&data_dir.join(DELAYS_FILE), &config)?;
            println!("Delay configuration updated.");
        }
    }
    Ok(())
}
