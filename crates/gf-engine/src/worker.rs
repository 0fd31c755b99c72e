//! Per-account generation loop: authenticate once, then produce one job per
//! iteration forever, with bounded retries and randomized pacing.

use std::time::Duration;

use gf_client::{Connector, RemoteSession};
use gf_config::DelayConfig;
use gf_core::{select_capability, AccountCredential, EngineError};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::pacing::pacing_delay;
use crate::prompt::PromptSampler;

/// Fixed wait between retries of a readiness-timeout attempt.
pub const RETRY_BACKOFF: Duration = Duration::from_secs(10);
/// Attempts allowed per iteration, the first try included.
pub const MAX_ATTEMPTS: u32 = 3;

/// Outcome of one worker iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The job completed; `attempts` counts the successful one.
    Completed { attempts: u32, result_urls: usize },
    /// Retries were exhausted or a non-retryable error occurred.
    Abandoned { attempts: u32 },
    /// Cancellation was observed mid-iteration.
    Cancelled,
}

/// Phase of the post-authentication state machine.
///
/// The loop alternates `Working -> Waiting -> Working…`; the iteration
/// counter advances only on the `Waiting -> Working` transition, so within
/// one account iterations are strictly sequential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Working { iteration: u64 },
    Waiting { iteration: u64 },
}

impl Phase {
    pub(crate) fn advance(self) -> Phase {
        match self {
            Phase::Working { iteration } => Phase::Waiting { iteration },
            Phase::Waiting { iteration } => Phase::Working {
                iteration: iteration + 1,
            },
        }
    }
}

/// One account's long-lived generation loop.
pub struct WorkerSession {
    account_index: usize,
    credential: AccountCredential,
    proxy: Option<String>,
    delays: DelayConfig,
    prompts: PromptSampler,
    cancel: CancellationToken,
}

impl WorkerSession {
    pub fn new(
        account_index: usize,
        credential: AccountCredential,
        proxy: Option<String>,
        delays: DelayConfig,
        prompts: PromptSampler,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            account_index,
            credential,
            proxy,
            delays,
            prompts,
            cancel,
        }
    }

    /// Run the account's loop until cancelled.
    ///
    /// Returns `Err` only when setup fails; iteration failures are contained
    /// and the loop continues.
    pub async fn run(self, connector: &dyn Connector) -> Result<(), EngineError> {
        if self.cancel.is_cancelled() {
            return Ok(());
        }

        let session = tokio::select! {
            _ = self.cancel.cancelled() => return Ok(()),
            result = self.authenticate(connector) => result?,
        };

        let mut rng = StdRng::from_entropy();
        let mut phase = Phase::Working { iteration: 1 };

        loop {
            if self.cancel.is_cancelled() {
                info!(account = self.account_index, "worker stopped");
                return Ok(());
            }
            match phase {
                Phase::Working { iteration } => {
                    match self
                        .run_iteration(session.as_ref(), iteration, &mut rng)
                        .await
                    {
                        IterationOutcome::Completed {
                            attempts,
                            result_urls,
                        } => {
                            info!(
                                account = self.account_index,
                                iteration,
                                attempts,
                                urls = result_urls,
                                "iteration completed"
                            );
                        }
                        IterationOutcome::Abandoned { attempts } => {
                            error!(
                                account = self.account_index,
                                iteration, attempts, "iteration abandoned"
                            );
                        }
                        IterationOutcome::Cancelled => return Ok(()),
                    }
                }
                Phase::Waiting { iteration } => {
                    let wait = pacing_delay(&self.delays, &mut rng);
                    info!(
                        account = self.account_index,
                        iteration,
                        wait_secs = wait.as_secs(),
                        "pacing before next iteration"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return Ok(()),
                        _ = tokio::time::sleep(wait) => {}
                    }
                }
            }
            phase = phase.advance();
        }
    }

    async fn authenticate(
        &self,
        connector: &dyn Connector,
    ) -> Result<Box<dyn RemoteSession>, EngineError> {
        if let Some(proxy) = self.proxy.as_deref() {
            info!(account = self.account_index, proxy, "connecting through proxy");
        }
        let session = connector
            .connect(&self.credential, self.proxy.as_deref())
            .await?;
        info!(
            account = self.account_index,
            user = %self.credential.username,
            "login succeeded"
        );
        Ok(session)
    }

    /// One iteration: up to [`MAX_ATTEMPTS`] tries, retrying only readiness
    /// timeouts, with the fixed backoff between tries.
    async fn run_iteration(
        &self,
        session: &dyn RemoteSession,
        iteration: u64,
        rng: &mut StdRng,
    ) -> IterationOutcome {
        let mut attempts = 0u32;
        loop {
            attempts += 1;
            let result = tokio::select! {
                _ = self.cancel.cancelled() => return IterationOutcome::Cancelled,
                result = self.attempt_job(session, iteration, rng) => result,
            };
            match result {
                Ok(result_urls) => {
                    return IterationOutcome::Completed {
                        attempts,
                        result_urls,
                    };
                }
                Err(err) if err.is_transient() && attempts < MAX_ATTEMPTS => {
                    warn!(
                        account = self.account_index,
                        iteration,
                        attempt = attempts,
                        backoff_secs = RETRY_BACKOFF.as_secs(),
                        "readiness timeout, retrying"
                    );
                    tokio::select! {
                        _ = self.cancel.cancelled() => return IterationOutcome::Cancelled,
                        _ = tokio::time::sleep(RETRY_BACKOFF) => {}
                    }
                }
                Err(err) if err.is_transient() => {
                    error!(
                        account = self.account_index,
                        iteration,
                        attempts,
                        error = %err,
                        "readiness timeouts exhausted"
                    );
                    return IterationOutcome::Abandoned { attempts };
                }
                Err(err) => {
                    error!(
                        account = self.account_index,
                        iteration,
                        error = %err,
                        "generation failed"
                    );
                    return IterationOutcome::Abandoned { attempts };
                }
            }
        }
    }

    async fn attempt_job(
        &self,
        session: &dyn RemoteSession,
        iteration: u64,
        rng: &mut StdRng,
    ) -> Result<usize, EngineError> {
        let catalog = session.await_capabilities().await?;
        let capability = select_capability(&catalog).ok_or(EngineError::NoCapabilities)?;
        let request = self.prompts.build_request(&capability.id, rng);
        info!(
            account = self.account_index,
            iteration,
            model = %capability.id,
            prompt = %request.positive_prompt,
            "submitting job"
        );
        let job = session.submit_job(&request).await?;
        let urls = job.await_completion().await?;
        Ok(urls.len())
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
