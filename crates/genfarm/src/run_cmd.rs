use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use gf_client::{Connector, HttpConnector, DEFAULT_BASE_URL};
use gf_config::{load_lines, LoadOutcome, ACCOUNTS_FILE, PROMPTS_FILE, PROXIES_FILE};
use gf_engine::{Orchestrator, PromptSampler};

use crate::delays_cmd::effective_delays;

/// Handle the run command: load the stores and fan out one worker per
/// account until shutdown.
pub(crate) async fn handle_run(
    data_dir: &Path,
    base_url: Option<&str>,
    cancel: CancellationToken,
) -> Result<()> {
    let delays = effective_delays(data_dir);

    let accounts_path = data_dir.join(ACCOUNTS_FILE);
    let lines = match load_lines(&accounts_path) {
        LoadOutcome::Loaded(lines) if !lines.is_empty() => lines,
        LoadOutcome::Loaded(_) => {
            anyhow::bail!("Account store is empty: {}", accounts_path.display());
        }
        LoadOutcome::Missing => {
            anyhow::bail!("Account store not found: {}", accounts_path.display());
        }
        LoadOutcome::Invalid(reason) => {
            anyhow::bail!(
                "Account store unreadable: {}: {reason}",
                accounts_path.display()
            );
        }
    };

    let proxies = match load_lines(&data_dir.join(PROXIES_FILE)) {
        LoadOutcome::Loaded(proxies) => {
            if proxies.is_empty() {
                info!("proxy store is empty; using direct connections");
            } else {
                info!(proxies = proxies.len(), "proxy store loaded");
            }
            proxies
        }
        LoadOutcome::Missing => {
            info!("no proxy store; using direct connections");
            Vec::new()
        }
        LoadOutcome::Invalid(reason) => {
            warn!(%reason, "proxy store unreadable; using direct connections");
            Vec::new()
        }
    };

    let custom_prompts = match load_lines(&data_dir.join(PROMPTS_FILE)) {
        LoadOutcome::Loaded(prompts) => {
            if !prompts.is_empty() {
                info!(prompts = prompts.len(), "custom prompts loaded");
            }
            prompts
        }
        LoadOutcome::Missing => Vec::new(),
        LoadOutcome::Invalid(reason) => {
            warn!(%reason, "prompt store unreadable; using built-in prompts");
            Vec::new()
        }
    };

    let connector: Arc<dyn Connector> = Arc::new(HttpConnector::new(
        base_url.unwrap_or(DEFAULT_BASE_URL),
    ));

    let orchestrator = Orchestrator::new(delays, PromptSampler::new(custom_prompts), cancel);
    let started = orchestrator.run_all(&lines, &proxies, connector).await;
    if started == 0 {
        error!("no workers started; check the account store");
    }

    Ok(())
}
