//! Periodic reward pass: check every token sequentially, claim where
//! available, then reschedule after a fixed interval.

use std::time::Duration;

use chrono::Utc;
use gf_client::RewardApi;
use gf_core::RewardToken;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Wait between full claim passes, independent of pass duration.
pub const CLAIM_CHECK_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Runs the claim loop: `Checking -> Claiming? -> Sleeping -> Checking…`.
pub struct ClaimScheduler {
    cancel: CancellationToken,
}

impl ClaimScheduler {
    pub fn new(cancel: CancellationToken) -> Self {
        Self { cancel }
    }

    /// Run claim passes until cancelled.
    ///
    /// An empty token list is fatal to the scheduler alone: it logs and
    /// returns without performing a single pass.
    pub async fn run(&self, tokens: &[RewardToken], api: &dyn RewardApi) {
        if tokens.is_empty() {
            error!("no claim tokens available; scheduler not started");
            return;
        }
        info!(tokens = tokens.len(), "claim scheduler started");

        loop {
            self.tick(tokens, api).await;
            if self.cancel.is_cancelled() {
                info!("claim scheduler stopped");
                return;
            }
            info!(
                interval_mins = CLAIM_CHECK_INTERVAL.as_secs() / 60,
                "claim pass finished; sleeping"
            );
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("claim scheduler stopped");
                    return;
                }
                _ = tokio::time::sleep(CLAIM_CHECK_INTERVAL) => {}
            }
        }
    }

    /// One sequential pass over all tokens.
    ///
    /// Per-token errors are logged and treated as "not claimable this
    /// tick"; they never stop the rest of the pass.
    pub async fn tick(&self, tokens: &[RewardToken], api: &dyn RewardApi) {
        for token in tokens {
            if self.cancel.is_cancelled() {
                return;
            }
            let status = match api.status(token).await {
                Ok(status) => status,
                Err(err) => {
                    error!(token = %token, error = %err, "reward status query failed");
                    continue;
                }
            };

            if status.can_claim {
                match api.claim(token).await {
                    Ok(true) => info!(token = %token, "reward claimed"),
                    Ok(false) => warn!(token = %token, "claim rejected by service"),
                    Err(err) => error!(token = %token, error = %err, "claim request failed"),
                }
            } else if let Some(wait) = status.remaining_wait(Utc::now().timestamp()) {
                let (hours, minutes) = split_hours_minutes(wait);
                info!(token = %token, hours, minutes, "reward not yet available");
            } else {
                info!(token = %token, "reward not yet claimable");
            }
        }
    }
}

/// Split a wait into whole hours and leftover minutes for log lines.
pub fn split_hours_minutes(wait: Duration) -> (u64, u64) {
    let minutes = wait.as_secs() / 60;
    (minutes / 60, minutes % 60)
}
