//! Multi-account orchestration: per-account worker loops with bounded
//! retries and randomized pacing, staggered fan-out, and the periodic
//! reward-claim scheduler.

pub mod claim;
pub mod orchestrator;
pub mod pacing;
pub mod prompt;
pub mod worker;

pub use claim::{split_hours_minutes, ClaimScheduler, CLAIM_CHECK_INTERVAL};
pub use orchestrator::{parse_roster, proxy_for_account, Orchestrator, Roster};
pub use pacing::{pacing_delay, startup_jitter};
pub use prompt::PromptSampler;
pub use worker::{IterationOutcome, WorkerSession, MAX_ATTEMPTS, RETRY_BACKOFF};
