//! Fan-out across accounts: credential validation, positional proxy
//! assignment, staggered starts, one task per account.

use std::sync::Arc;

use gf_client::Connector;
use gf_config::DelayConfig;
use gf_core::AccountCredential;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::pacing::startup_jitter;
use crate::prompt::PromptSampler;
use crate::worker::WorkerSession;

/// Valid account records with their 1-based store positions.
#[derive(Debug, Default)]
pub struct Roster {
    pub accounts: Vec<(usize, AccountCredential)>,
    pub skipped: usize,
}

/// Parse raw credential lines, skipping malformed records with a warning.
///
/// Store position (1-based) is preserved for valid records so proxy
/// assignment and log labels stay aligned with the file.
pub fn parse_roster(lines: &[String]) -> Roster {
    let mut roster = Roster::default();
    for (position, line) in lines.iter().enumerate() {
        let index = position + 1;
        match AccountCredential::parse(line) {
            Ok(credential) => roster.accounts.push((index, credential)),
            Err(err) => {
                warn!(line = index, error = %err, "skipping malformed credential line");
                roster.skipped += 1;
            }
        }
    }
    roster
}

/// Positional proxy lookup: the account at 1-based `index` gets
/// `proxies[index - 1]`, or a direct connection when the list is shorter.
pub fn proxy_for_account(proxies: &[String], index: usize) -> Option<&str> {
    proxies.get(index - 1).map(String::as_str)
}

/// Spawns and supervises one worker per account.
pub struct Orchestrator {
    delays: DelayConfig,
    prompts: PromptSampler,
    cancel: CancellationToken,
}

impl Orchestrator {
    pub fn new(delays: DelayConfig, prompts: PromptSampler, cancel: CancellationToken) -> Self {
        Self {
            delays,
            prompts,
            cancel,
        }
    }

    /// Spawn one worker per valid account and run them to cancellation.
    ///
    /// Returns the number of workers started. A worker's setup failure is
    /// logged here and never affects sibling accounts.
    pub async fn run_all(
        &self,
        lines: &[String],
        proxies: &[String],
        connector: Arc<dyn Connector>,
    ) -> usize {
        let roster = parse_roster(lines);
        if roster.accounts.is_empty() {
            warn!(skipped = roster.skipped, "no valid accounts to run");
            return 0;
        }
        info!(
            accounts = roster.accounts.len(),
            skipped = roster.skipped,
            proxies = proxies.len(),
            "starting workers"
        );

        let mut rng = StdRng::from_entropy();
        let mut join_set = JoinSet::new();

        for (index, credential) in roster.accounts {
            let jitter = startup_jitter(&self.delays, &mut rng);
            let proxy = proxy_for_account(proxies, index).map(str::to_string);
            let worker = WorkerSession::new(
                index,
                credential,
                proxy,
                self.delays,
                self.prompts.clone(),
                self.cancel.clone(),
            );
            let connector = Arc::clone(&connector);
            let cancel = self.cancel.clone();

            info!(
                account = index,
                jitter_ms = jitter.as_millis() as u64,
                "scheduling worker"
            );
            join_set.spawn(async move {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = tokio::time::sleep(jitter) => {}
                }
                if let Err(err) = worker.run(connector.as_ref()).await {
                    error!(account = index, error = %err, "worker terminated");
                }
            });
        }

        let started = join_set.len();
        while join_set.join_next().await.is_some() {}
        started
    }
}
